#![forbid(unsafe_code)]

//! Scene renderer.
//!
//! Draws one frame onto a [`Surface`]: the static bench (source, barrier
//! with two slits, screen line), then either the wave view (expanding
//! wavefronts plus the intensity strip on the screen) or the particle view
//! (in-flight dots plus accumulated landings).
//!
//! # Design
//!
//! Horizontal positions are multiplied by
//! [`SceneGeometry::display_scale`] so the screen line always stays on the
//! canvas; vertical positions are unscaled. Every color goes through the
//! shared [`ColorMapper`], and arc opacities are quantized so the color
//! cache stays bounded while wavefronts fade.

use crate::accumulation::ScreenAccumulationBuffer;
use crate::config::RuntimeConfig;
use crate::particles::Particle;
use fringe_core::{IntensityModel, SceneGeometry, SimulationParams};
use fringe_render::{ColorMapper, Draw, PackedRgba, Surface};
use std::f64::consts::FRAC_PI_2;

/// Canvas background.
pub const BACKGROUND: PackedRgba = PackedRgba::rgb(8, 8, 16);
/// Barrier fill.
pub const BARRIER: PackedRgba = PackedRgba::rgb(120, 120, 130);
/// Screen line.
pub const SCREEN_LINE: PackedRgba = PackedRgba::rgb(200, 200, 200);

const BARRIER_THICKNESS: f64 = 4.0;
const SOURCE_RADIUS: f64 = 6.0;
const WAVEFRONT_PEAK_OPACITY: f64 = 0.6;
const ACCUMULATION_OPACITY: f64 = 0.5;
const OPACITY_LEVELS: f64 = 64.0;

/// Stateless apart from its color cache; all scene state is passed in.
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    colors: ColorMapper,
    strip_row_step: u16,
    strip_width: f64,
    wavefront_divisor: f64,
    wave_speed: f64,
    particle_radius: f64,
}

impl SceneRenderer {
    /// Renderer using the drawing knobs of `config`.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            colors: ColorMapper::new(),
            strip_row_step: config.strip_row_step.max(1),
            strip_width: config.strip_width,
            wavefront_divisor: config.wavefront_divisor,
            wave_speed: config.wave_speed,
            particle_radius: config.particle_radius,
        }
    }

    /// The shared color cache.
    pub fn colors(&self) -> &ColorMapper {
        &self.colors
    }

    /// Mutable access to the color cache.
    pub fn colors_mut(&mut self) -> &mut ColorMapper {
        &mut self.colors
    }

    /// Clear to the background and draw source, barrier and screen line.
    pub fn draw_static(
        &mut self,
        surface: &mut Surface,
        geometry: &SceneGeometry,
        params: &SimulationParams,
    ) {
        surface.clear_with(BACKGROUND);
        let scale = geometry.display_scale(params);
        let height = f64::from(geometry.height);

        let source = self.colors.to_opaque(params.wavelength_nm);
        surface.fill_circle(
            geometry.source_x * scale,
            geometry.center_y(),
            SOURCE_RADIUS,
            source,
        );

        // Barrier: three solid segments around the two gaps. Overlapping
        // gaps produce an empty middle segment.
        let barrier_left = geometry.barrier_x * scale - BARRIER_THICKNESS / 2.0;
        let half_gap = geometry.slit_gap(params) / 2.0;
        let [upper, lower] = geometry.slit_centers(params);
        let segments = [
            (0.0, upper - half_gap),
            (upper + half_gap, lower - half_gap),
            (lower + half_gap, height),
        ];
        for (top, bottom) in segments {
            surface.fill_rect_f64(barrier_left, top, BARRIER_THICKNESS, bottom - top, BARRIER);
        }

        surface.fill_rect_f64(
            geometry.screen_x(params) * scale - 1.0,
            0.0,
            2.0,
            height,
            SCREEN_LINE,
        );
    }

    /// Wave view: fading wavefronts from each slit and the intensity strip.
    pub fn draw_wave(
        &mut self,
        surface: &mut Surface,
        model: &mut IntensityModel,
        params: &SimulationParams,
        frame: u64,
    ) {
        let geometry = *model.geometry();
        let scale = geometry.display_scale(params);
        let barrier_x = geometry.barrier_x * scale;
        let screen_x = geometry.screen_x(params) * scale;
        let reach = screen_x - barrier_x;

        let spacing = params.wavelength_nm / self.wavefront_divisor;
        if spacing.is_finite() && spacing > 0.0 && reach > 0.0 {
            let phase = (frame as f64 * self.wave_speed).rem_euclid(spacing);
            for center_y in geometry.slit_centers(params) {
                let mut radius = phase;
                while radius <= reach {
                    let opacity = quantize(WAVEFRONT_PEAK_OPACITY * (1.0 - radius / reach));
                    if opacity > 0.0 {
                        let color = self.colors.to_color(params.wavelength_nm, opacity);
                        surface.draw_arc(barrier_x, center_y, radius, -FRAC_PI_2, FRAC_PI_2, color);
                    }
                    radius += spacing;
                }
            }
        }

        let step = self.strip_row_step;
        let mut y = 0u16;
        while y < geometry.height {
            let intensity = model.intensity(params, f64::from(y));
            let color = self.colors.to_color(params.wavelength_nm, intensity);
            surface.fill_rect_f64(screen_x, f64::from(y), self.strip_width, f64::from(step), color);
            y = y.saturating_add(step);
        }
    }

    /// Particle view: in-flight dots and the accumulated landings.
    pub fn draw_particles(
        &mut self,
        surface: &mut Surface,
        geometry: &SceneGeometry,
        params: &SimulationParams,
        particles: &[Particle],
        screen: &ScreenAccumulationBuffer,
    ) {
        let scale = geometry.display_scale(params);
        let dot = self.colors.to_opaque(params.wavelength_nm);
        for particle in particles {
            surface.fill_circle(particle.x * scale, particle.y, self.particle_radius, dot);
        }

        let screen_x = geometry.screen_x(params) * scale;
        for point in screen.iter() {
            let color = self
                .colors
                .to_color(params.wavelength_nm, point.intensity * ACCUMULATION_OPACITY);
            surface.fill_rect_f64(screen_x, point.y.floor(), self.strip_width, 1.0, color);
        }
    }
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::from_config(&RuntimeConfig::default())
    }
}

fn quantize(opacity: f64) -> f64 {
    (opacity.clamp(0.0, 1.0) * OPACITY_LEVELS).round() / OPACITY_LEVELS
}
