#![forbid(unsafe_code)]

//! Fraunhofer double-slit intensity.
//!
//! `I(θ) = sinc²(α) · cos²(δ)` with `α = π·a·sinθ/λ` and `δ = π·d·sinθ/λ`.
//! Both factors lie in `[0, 1]`, so the product does too. This one function
//! drives the wave-mode color strip and the particle-mode landing
//! distribution, which is what makes the two views agree.

use crate::geometry::SceneGeometry;
use crate::memo::{CacheStats, MemoCache, f64_key};
use crate::params::SimulationParams;
use std::f64::consts::PI;

const NM_TO_M: f64 = 1e-9;
const UM_TO_M: f64 = 1e-6;

/// Single-slit envelope `sinc²(α)`, defined as 1 at `α = 0`.
#[inline]
pub fn diffraction_factor(alpha: f64) -> f64 {
    if alpha == 0.0 {
        return 1.0;
    }
    let s = alpha.sin() / alpha;
    s * s
}

/// Two-slit modulation `cos²(δ)`.
#[inline]
pub fn interference_factor(delta: f64) -> f64 {
    let c = delta.cos();
    c * c
}

/// Angle of screen row `y` from the optical axis, seen from the barrier.
#[inline]
pub fn screen_angle(geometry: &SceneGeometry, params: &SimulationParams, y: f64) -> f64 {
    (y - geometry.center_y()).atan2(geometry.propagation_distance(params))
}

/// Uncached intensity at screen row `y`, in `[0, 1]`.
///
/// Non-finite intermediate results map to 0 so a bad input darkens a row
/// instead of poisoning a whole distribution.
pub fn compute_intensity(geometry: &SceneGeometry, params: &SimulationParams, y: f64) -> f64 {
    let sin_theta = screen_angle(geometry, params, y).sin();
    let lambda = params.wavelength_nm * NM_TO_M;
    let a = params.slit_width_um * UM_TO_M;
    let d = params.slit_distance_um * UM_TO_M;

    let alpha = PI * a * sin_theta / lambda;
    let delta = PI * d * sin_theta / lambda;
    let value = diffraction_factor(alpha) * interference_factor(delta);
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Memoized intensity model bound to one bench layout.
#[derive(Debug, Clone)]
pub struct IntensityModel {
    geometry: SceneGeometry,
    cache: MemoCache<[u64; 5], f64>,
}

impl IntensityModel {
    /// Create a model with an empty cache.
    pub fn new(geometry: SceneGeometry) -> Self {
        Self {
            geometry,
            cache: MemoCache::new(),
        }
    }

    /// Bench layout this model evaluates against.
    #[inline]
    pub fn geometry(&self) -> &SceneGeometry {
        &self.geometry
    }

    /// Normalized intensity at screen row `y`, cached by
    /// `(y, wavelength, slit width, slit distance, screen distance)`.
    pub fn intensity(&mut self, params: &SimulationParams, y: f64) -> f64 {
        let [wl, sw, sd, sc] = params.key();
        let key = [f64_key(y), wl, sw, sd, sc];
        let geometry = self.geometry;
        *self
            .cache
            .get_or_insert_with(key, || compute_intensity(&geometry, params, y))
    }

    /// Drop every cached value.
    pub fn reset(&mut self) {
        self.cache.reset();
    }

    /// Cache counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
