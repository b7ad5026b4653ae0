#![forbid(unsafe_code)]

//! Simulation state machine.
//!
//! [`Simulation`] owns every piece of per-run state: the intensity model and
//! its cache, the landing sampler, the particle engine, the screen
//! accumulation buffer, the renderer, the RNG, and the current mode. One
//! call to [`Simulation::step`] advances one frame and draws it.
//!
//! # Invariants
//!
//! - Switching mode empties both the particle list and the accumulation
//!   buffer before anything else happens.
//! - A change of slit width, slit distance or screen distance empties the
//!   particle list; landings already on the screen are re-filtered against
//!   the new pattern on the next particle frame.
//! - Invalid controls never panic: the frame draws the background only and
//!   the report is marked as skipped.

use crate::accumulation::ScreenAccumulationBuffer;
use crate::config::RuntimeConfig;
use crate::particles::{EngineContext, FrameStats, ParticleEngine};
use crate::scene::{BACKGROUND, SceneRenderer};
use fringe_core::{Controls, IntensityModel, Mode, ParticleSampler, SimulationParams};
use fringe_render::Surface;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Zero-based frame index.
    pub frame: u64,
    /// Mode the frame was drawn in.
    pub mode: Mode,
    /// Particle counters (particle mode only).
    pub stats: Option<FrameStats>,
    /// Landings faded out this frame.
    pub faded: usize,
    /// Whether the controls were rejected and only the background drawn.
    pub skipped: bool,
}

/// Owner of all simulation state.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: RuntimeConfig,
    model: IntensityModel,
    sampler: ParticleSampler,
    engine: ParticleEngine,
    screen: ScreenAccumulationBuffer,
    renderer: SceneRenderer,
    rng: StdRng,
    mode: Mode,
    last_params: Option<SimulationParams>,
    frame: u64,
}

impl Simulation {
    /// Build a simulation from `config`; an unset seed draws one from the OS.
    pub fn new(config: RuntimeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            model: IntensityModel::new(config.geometry),
            sampler: ParticleSampler::new(),
            engine: ParticleEngine::new(config.emission_probability),
            screen: ScreenAccumulationBuffer::new(config.persistence_threshold),
            renderer: SceneRenderer::from_config(&config),
            rng,
            mode: Mode::default(),
            last_params: None,
            frame: 0,
            config,
        }
    }

    /// Runtime configuration in use.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Particle engine.
    pub fn engine(&self) -> &ParticleEngine {
        &self.engine
    }

    /// Mutable particle engine (tests inject particles through this).
    pub fn engine_mut(&mut self) -> &mut ParticleEngine {
        &mut self.engine
    }

    /// Screen accumulation buffer.
    pub fn screen(&self) -> &ScreenAccumulationBuffer {
        &self.screen
    }

    /// Intensity model.
    pub fn model(&self) -> &IntensityModel {
        &self.model
    }

    /// Scene renderer.
    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    /// Switch mode. Returns `true` if the mode changed, in which case the
    /// particles and the accumulation buffer are emptied.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode == self.mode {
            return false;
        }
        tracing::debug!(from = %self.mode, to = %mode, "mode switch");
        self.mode = mode;
        self.engine.clear();
        self.screen.clear();
        true
    }

    /// Record the parameters about to be used. Returns `true` if the
    /// geometry changed since the previous frame, in which case in-flight
    /// particles are dropped.
    pub fn observe_params(&mut self, params: &SimulationParams) -> bool {
        let changed = self
            .last_params
            .is_some_and(|last| last.geometry_differs(params));
        self.last_params = Some(*params);
        if changed {
            tracing::debug!(
                slit_width_um = params.slit_width_um,
                slit_distance_um = params.slit_distance_um,
                screen_distance = params.screen_distance,
                "geometry changed"
            );
            self.engine.clear();
        }
        changed
    }

    /// Drop every memoized value (intensity, distributions, colors).
    pub fn reset_caches(&mut self) {
        self.model.reset();
        self.sampler.reset();
        self.renderer.colors_mut().reset();
    }

    /// Advance and draw one frame.
    ///
    /// Order: mode and geometry bookkeeping, then (in particle mode)
    /// emission, advancement, landing, and fading, then drawing.
    pub fn step(&mut self, controls: &Controls, surface: &mut Surface) -> FrameReport {
        let mut controls = *controls;
        controls.params = controls.params.sanitized();
        let frame = self.frame;
        self.frame += 1;

        self.set_mode(controls.mode);

        if let Err(err) = controls.validate(self.model.geometry()) {
            tracing::warn!(error = %err, frame, "rejecting controls for this frame");
            surface.clear_with(BACKGROUND);
            return FrameReport {
                frame,
                mode: self.mode,
                stats: None,
                faded: 0,
                skipped: true,
            };
        }

        let params = controls.params;
        self.observe_params(&params);
        let geometry = *self.model.geometry();
        self.renderer.draw_static(surface, &geometry, &params);

        let mut report = FrameReport {
            frame,
            mode: self.mode,
            stats: None,
            faded: 0,
            skipped: false,
        };
        match self.mode {
            Mode::Wave => {
                self.renderer.draw_wave(surface, &mut self.model, &params, frame);
            }
            Mode::Particle => {
                let stats = self.engine.update(EngineContext {
                    controls: &controls,
                    model: &mut self.model,
                    sampler: &mut self.sampler,
                    screen: &mut self.screen,
                    rng: &mut self.rng,
                });
                report.faded = self.screen.retain_visible(&params, &mut self.model);
                report.stats = Some(stats);
                self.renderer.draw_particles(
                    surface,
                    &geometry,
                    &params,
                    self.engine.particles(),
                    &self.screen,
                );
            }
        }
        match report.stats {
            Some(stats) => tracing::trace!(
                frame,
                emitted = stats.emitted,
                suppressed = stats.suppressed,
                landed = stats.landed,
                discarded = stats.discarded,
                active = stats.active,
                faded = report.faded,
                "particle frame"
            ),
            None => tracing::trace!(frame, "wave frame"),
        }
        report
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}
