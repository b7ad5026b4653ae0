#![forbid(unsafe_code)]

//! Screen accumulation buffer.
//!
//! Particle landings build up a histogram on the detection screen. Points
//! are kept in landing order; each carries the intensity it was drawn with
//! and disappears once the current intensity at its row drops below the
//! persistence threshold (the parameters may have changed since it landed).
//!
//! # Invariants
//!
//! - Every point's `y` lies on the canvas.
//! - After [`ScreenAccumulationBuffer::retain_visible`], every remaining
//!   point sits at a row whose current intensity is at least the threshold.

use fringe_core::{IntensityModel, SimulationParams};

/// One landing on the detection screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Landing row in canvas pixels.
    pub y: f64,
    /// Drawing intensity in `[0, 1]`.
    pub intensity: f64,
}

impl ScreenPoint {
    /// A fresh landing at full intensity.
    #[inline]
    pub const fn landed(y: f64) -> Self {
        Self { y, intensity: 1.0 }
    }
}

/// Append-only list of landings with intensity-driven fading.
#[derive(Debug, Clone)]
pub struct ScreenAccumulationBuffer {
    points: Vec<ScreenPoint>,
    persistence_threshold: f64,
}

impl ScreenAccumulationBuffer {
    /// Create an empty buffer fading points below `persistence_threshold`.
    pub fn new(persistence_threshold: f64) -> Self {
        Self {
            points: Vec::new(),
            persistence_threshold,
        }
    }

    /// Record a landing.
    pub fn record(&mut self, point: ScreenPoint) {
        self.points.push(point);
    }

    /// Drop points whose row is now darker than the persistence threshold.
    ///
    /// Returns how many points were removed.
    pub fn retain_visible(
        &mut self,
        params: &SimulationParams,
        model: &mut IntensityModel,
    ) -> usize {
        let before = self.points.len();
        let threshold = self.persistence_threshold;
        self.points.retain(|point| model.intensity(params, point.y) >= threshold);
        before - self.points.len()
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the buffer holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in landing order.
    pub fn iter(&self) -> impl Iterator<Item = &ScreenPoint> {
        self.points.iter()
    }

    /// Points as a slice.
    pub fn points(&self) -> &[ScreenPoint] {
        &self.points
    }

    /// Fade threshold.
    pub fn persistence_threshold(&self) -> f64 {
        self.persistence_threshold
    }

    /// Count landings into `bins` equal bands over `[0, height)`.
    ///
    /// Points exactly on the bottom edge fall in the last bin.
    pub fn histogram(&self, bins: usize, height: f64) -> Vec<u32> {
        let mut counts = vec![0u32; bins];
        if bins == 0 || !(height > 0.0) {
            return counts;
        }
        let last = bins - 1;
        for point in &self.points {
            let band = (point.y / height * bins as f64).floor();
            if band.is_finite() && band >= 0.0 {
                counts[(band as usize).min(last)] += 1;
            }
        }
        counts
    }
}

impl Default for ScreenAccumulationBuffer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PERSISTENCE_THRESHOLD)
    }
}
