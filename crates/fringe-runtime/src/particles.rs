#![forbid(unsafe_code)]

//! Particle engine.
//!
//! Each frame runs three phases in order: at most one emission, advancement
//! of every in-flight particle, then landing. A particle whose next step
//! would reach the screen plane lands this frame at the exact screen-plane
//! intersection of its straight path; one that leaves the canvas vertically
//! first is discarded.
//!
//! # Invariants
//!
//! - Every live particle satisfies `barrier_x <= x < screen_x` and lies
//!   vertically on the canvas.
//! - A particle emitted at angle 0 lands after `ceil((screen_x -
//!   barrier_x) / speed)` frames. Positions are summed frame by frame, so a
//!   step ending within [`LANDING_EPSILON`] (relative to `screen_x`) of the
//!   plane counts as reaching it.

use crate::accumulation::{ScreenAccumulationBuffer, ScreenPoint};
use fringe_core::{Controls, IntensityModel, ParticleSampler, SceneGeometry, SimulationParams};
use rand::Rng;

/// One photon in flight between barrier and screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Horizontal position in simulation space.
    pub x: f64,
    /// Vertical position in canvas pixels.
    pub y: f64,
    /// Direction of travel in radians from the horizontal.
    pub angle: f64,
    /// Horizontal advance per frame.
    pub speed: f64,
}

impl Particle {
    /// A particle at `(x, y)` heading along `angle`.
    pub const fn new(x: f64, y: f64, angle: f64, speed: f64) -> Self {
        Self { x, y, angle, speed }
    }

    /// Where the straight path crosses the plane `x = plane_x`.
    #[inline]
    pub fn intersect_y(&self, plane_x: f64) -> f64 {
        self.y + (plane_x - self.x) * self.angle.tan()
    }
}

/// Outcome of moving one particle by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Still between barrier and screen.
    InFlight,
    /// Reached the screen plane at this row.
    Landed(f64),
    /// Left the canvas, or would land off it.
    Discarded,
}

/// Counters for one frame (or accumulated over many).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Particles created.
    pub emitted: u64,
    /// Emissions dropped because their landing row was below the intensity
    /// threshold.
    pub suppressed: u64,
    /// Emissions skipped because no landing distribution existed.
    pub failed: u64,
    /// Landings recorded on the screen.
    pub landed: u64,
    /// Particles removed without a recorded landing.
    pub discarded: u64,
    /// Particles still in flight at the end of the frame.
    pub active: usize,
}

impl FrameStats {
    /// Fold `other` into these counters; `active` takes the latest value.
    pub fn absorb(&mut self, other: &FrameStats) {
        self.emitted += other.emitted;
        self.suppressed += other.suppressed;
        self.failed += other.failed;
        self.landed += other.landed;
        self.discarded += other.discarded;
        self.active = other.active;
    }
}

/// Borrowed kernel state one engine update needs.
pub struct EngineContext<'a, R: Rng + ?Sized> {
    /// Current controls.
    pub controls: &'a Controls,
    /// Intensity model (shared cache).
    pub model: &'a mut IntensityModel,
    /// Landing sampler.
    pub sampler: &'a mut ParticleSampler,
    /// Destination for landings.
    pub screen: &'a mut ScreenAccumulationBuffer,
    /// Randomness source.
    pub rng: &'a mut R,
}

/// Owns the in-flight particles.
#[derive(Debug, Clone)]
pub struct ParticleEngine {
    particles: Vec<Particle>,
    emission_probability: f64,
    totals: FrameStats,
}

impl ParticleEngine {
    /// Create an engine emitting with the given per-frame probability.
    ///
    /// Probabilities outside `[0, 1]` are clamped; NaN disables emission.
    pub fn new(emission_probability: f64) -> Self {
        let emission_probability = if emission_probability.is_nan() {
            0.0
        } else {
            emission_probability.clamp(0.0, 1.0)
        };
        Self {
            particles: Vec::new(),
            emission_probability,
            totals: FrameStats::default(),
        }
    }

    /// Particles currently in flight.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles in flight.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Effective emission probability.
    pub fn emission_probability(&self) -> f64 {
        self.emission_probability
    }

    /// Counters accumulated since construction.
    pub fn totals(&self) -> FrameStats {
        self.totals
    }

    /// Drop every in-flight particle.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.totals.active = 0;
    }

    /// Insert a particle directly.
    pub fn spawn(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Run one frame: emission, advancement, landing.
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: EngineContext<'_, R>) -> FrameStats {
        let EngineContext {
            controls,
            model,
            sampler,
            screen,
            rng,
        } = ctx;
        let params = &controls.params;
        let geometry = *model.geometry();
        let mut stats = FrameStats::default();

        if rng.gen_bool(self.emission_probability) {
            self.emit(controls, &geometry, model, sampler, rng, &mut stats);
        }

        let screen_x = geometry.screen_x(params);
        self.particles.retain_mut(|particle| {
            match advance(particle, screen_x, &geometry) {
                Step::InFlight => true,
                Step::Landed(y) => {
                    screen.record(ScreenPoint::landed(y));
                    stats.landed += 1;
                    false
                }
                Step::Discarded => {
                    stats.discarded += 1;
                    false
                }
            }
        });

        stats.active = self.particles.len();
        self.totals.absorb(&stats);
        stats
    }

    fn emit<R: Rng + ?Sized>(
        &mut self,
        controls: &Controls,
        geometry: &SceneGeometry,
        model: &mut IntensityModel,
        sampler: &mut ParticleSampler,
        rng: &mut R,
        stats: &mut FrameStats,
    ) {
        let params: &SimulationParams = &controls.params;
        let slits = geometry.slit_centers(params);
        let start_y = if rng.gen_bool(0.5) { slits[0] } else { slits[1] };
        match sampler.sample(start_y, params, controls.intensity_threshold, model, rng) {
            Ok(sample) if sample.should_show => {
                self.particles.push(Particle::new(
                    geometry.barrier_x,
                    start_y,
                    sample.angle,
                    controls.particle_speed,
                ));
                stats.emitted += 1;
            }
            Ok(_) => stats.suppressed += 1,
            Err(err) => {
                tracing::warn!(error = %err, "skipping particle emission");
                stats.failed += 1;
            }
        }
    }
}

impl Default for ParticleEngine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EMISSION_PROBABILITY)
    }
}

/// Relative tolerance for reaching the screen plane.
///
/// Absorbs the rounding error of summing `speed` thousands of times.
pub const LANDING_EPSILON: f64 = 1e-9;

/// Move one particle by one frame.
pub fn advance(particle: &mut Particle, screen_x: f64, geometry: &SceneGeometry) -> Step {
    let next_x = particle.x + particle.speed;
    let reach = screen_x - LANDING_EPSILON * screen_x.abs().max(1.0);
    if next_x >= reach {
        let y = particle.intersect_y(screen_x);
        return if geometry.contains_y(y) {
            Step::Landed(y)
        } else {
            Step::Discarded
        };
    }
    particle.x = next_x;
    particle.y += particle.speed * particle.angle.tan();
    if geometry.contains_y(particle.y) {
        Step::InFlight
    } else {
        Step::Discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Kernel {
        controls: Controls,
        model: IntensityModel,
        sampler: ParticleSampler,
        screen: ScreenAccumulationBuffer,
        rng: StdRng,
    }

    impl Kernel {
        fn new(seed: u64) -> Self {
            Self {
                controls: Controls::default(),
                model: IntensityModel::new(SceneGeometry::DEFAULT),
                sampler: ParticleSampler::new(),
                screen: ScreenAccumulationBuffer::default(),
                rng: StdRng::seed_from_u64(seed),
            }
        }

        fn update(&mut self, engine: &mut ParticleEngine) -> FrameStats {
            engine.update(EngineContext {
                controls: &self.controls,
                model: &mut self.model,
                sampler: &mut self.sampler,
                screen: &mut self.screen,
                rng: &mut self.rng,
            })
        }
    }

    #[test]
    fn straight_particle_lands_after_expected_frames() {
        let mut kernel = Kernel::new(1);
        kernel.controls.particle_speed = 3.0;
        let mut engine = ParticleEngine::new(0.0);
        engine.spawn(Particle::new(200.0, 200.0, 0.0, 3.0));

        // (500 - 200) / 3 = 100 frames.
        for frame in 1..100 {
            let stats = kernel.update(&mut engine);
            assert_eq!(stats.landed, 0, "landed early at frame {frame}");
        }
        let stats = kernel.update(&mut engine);
        assert_eq!(stats.landed, 1);
        assert!(engine.is_empty());
        assert_eq!(kernel.screen.len(), 1);
        assert_eq!(kernel.screen.points()[0].y, 200.0);
    }

    #[test]
    fn slow_particles_do_not_land_late() {
        let geometry = SceneGeometry::DEFAULT;
        for speed in [0.01, 0.02, 0.03, 0.08, 0.15, 0.7, 1.1] {
            let expected = (300.0_f64 / speed).ceil() as usize;
            let mut particle = Particle::new(200.0, 200.0, 0.0, speed);
            let mut frames = 0;
            let step = loop {
                frames += 1;
                match advance(&mut particle, 500.0, &geometry) {
                    Step::InFlight => assert!(frames < expected, "speed {speed} overshot"),
                    other => break other,
                }
            };
            assert_eq!(step, Step::Landed(200.0));
            assert_eq!(frames, expected, "speed {speed}");
        }
    }

    #[test]
    fn step_short_of_plane_stays_in_flight() {
        let geometry = SceneGeometry::DEFAULT;
        let mut particle = Particle::new(498.0, 200.0, 0.0, 1.5);
        assert_eq!(advance(&mut particle, 500.0, &geometry), Step::InFlight);
        assert_eq!(particle.x, 499.5);
    }

    #[test]
    fn landing_uses_plane_intersection() {
        let geometry = SceneGeometry::DEFAULT;
        let angle = 0.1_f64;
        let mut particle = Particle::new(495.0, 200.0, angle, 10.0);
        let step = advance(&mut particle, 500.0, &geometry);
        let expected = 200.0 + 5.0 * angle.tan();
        assert_eq!(step, Step::Landed(expected));
    }

    #[test]
    fn leaving_canvas_discards() {
        let geometry = SceneGeometry::DEFAULT;
        let mut particle = Particle::new(200.0, 1.0, -0.5, 5.0);
        assert_eq!(advance(&mut particle, 500.0, &geometry), Step::Discarded);
    }

    #[test]
    fn off_canvas_landing_discards() {
        let geometry = SceneGeometry::DEFAULT;
        let mut particle = Particle::new(499.0, 399.0, 1.4, 5.0);
        assert_eq!(advance(&mut particle, 500.0, &geometry), Step::Discarded);
    }

    #[test]
    fn live_particles_stay_between_planes() {
        let mut kernel = Kernel::new(7);
        let mut engine = ParticleEngine::new(1.0);
        for _ in 0..400 {
            kernel.update(&mut engine);
            for particle in engine.particles() {
                assert!(particle.x >= 200.0 && particle.x < 500.0);
                assert!((0.0..=400.0).contains(&particle.y));
            }
        }
        let totals = engine.totals();
        assert!(totals.emitted > 0);
        assert!(totals.landed > 0);
        assert_eq!(totals.landed as usize, kernel.screen.len());
    }

    #[test]
    fn zero_probability_never_emits() {
        let mut kernel = Kernel::new(3);
        let mut engine = ParticleEngine::new(0.0);
        for _ in 0..50 {
            let stats = kernel.update(&mut engine);
            assert_eq!(stats.emitted + stats.suppressed + stats.failed, 0);
        }
        assert!(engine.is_empty());
    }

    #[test]
    fn nan_probability_disables_emission() {
        assert_eq!(ParticleEngine::new(f64::NAN).emission_probability(), 0.0);
        assert_eq!(ParticleEngine::new(3.0).emission_probability(), 1.0);
    }

    #[test]
    fn clear_drops_particles() {
        let mut engine = ParticleEngine::default();
        engine.spawn(Particle::new(250.0, 200.0, 0.0, 2.0));
        engine.clear();
        assert!(engine.is_empty());
    }
}
