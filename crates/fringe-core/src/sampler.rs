#![forbid(unsafe_code)]

//! Particle landing sampler.
//!
//! The screen is discretized into one bin per canvas row. Each bin's weight is
//! the [`IntensityModel`] value at that row; normalized, the weights are the
//! probability that a single particle lands there. Draws use inverse-CDF
//! sampling with a linear scan, which is plenty for a few hundred rows.

use crate::intensity::IntensityModel;
use crate::memo::{CacheStats, MemoCache};
use crate::params::SimulationParams;
use rand::Rng;
use std::fmt;

/// Sampling failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    /// Every row had zero (or non-finite) weight, so there is nothing to
    /// normalize against.
    DegenerateDistribution { rows: usize },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateDistribution { rows } => {
                write!(f, "landing distribution over {rows} rows has zero total weight")
            }
        }
    }
}

impl std::error::Error for SampleError {}

/// Normalized probability of landing on each screen row.
#[derive(Debug, Clone, PartialEq)]
pub struct LandingDistribution {
    probabilities: Vec<f64>,
    /// Last row with non-zero probability; absorbs rounding residue.
    last_positive: usize,
}

impl LandingDistribution {
    /// Evaluate the model at every integer row `0..height` and normalize.
    pub fn build(
        model: &mut IntensityModel,
        params: &SimulationParams,
    ) -> Result<Self, SampleError> {
        let rows = model.geometry().height;
        let weights = (0..rows)
            .map(|row| model.intensity(params, f64::from(row)))
            .collect();
        Self::from_weights(weights)
    }

    /// Normalize raw non-negative weights into a distribution.
    ///
    /// Negative and non-finite weights count as zero.
    pub fn from_weights(mut weights: Vec<f64>) -> Result<Self, SampleError> {
        for w in weights.iter_mut() {
            if !w.is_finite() || *w < 0.0 {
                *w = 0.0;
            }
        }
        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(SampleError::DegenerateDistribution {
                rows: weights.len(),
            });
        }
        for w in weights.iter_mut() {
            *w /= total;
        }
        let last_positive = weights.iter().rposition(|&p| p > 0.0).unwrap_or(0);
        Ok(Self {
            probabilities: weights,
            last_positive,
        })
    }

    /// Per-row probabilities, summing to 1.
    #[inline]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.probabilities.len()
    }

    /// Sum of all probabilities (1 up to rounding).
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Map a uniform draw `u` in `[0, 1)` to a row.
    ///
    /// Subtracts each row's probability from `u` in order and returns the row
    /// that drives it below zero. Zero-probability rows are never returned.
    pub fn sample_row(&self, u: f64) -> usize {
        let mut remaining = u;
        for (row, &p) in self.probabilities.iter().enumerate() {
            remaining -= p;
            if remaining < 0.0 {
                return row;
            }
        }
        self.last_positive
    }
}

/// Outcome of one particle draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    /// Screen row the particle is aimed at.
    pub end_y: f64,
    /// Whether the particle registers: intensity at `end_y` exceeds the
    /// emission threshold.
    pub should_show: bool,
    /// Flight direction from the slit to `end_y`, fixed at emission.
    pub angle: f64,
}

/// Draws landing rows, caching one distribution per parameter set.
#[derive(Debug, Clone, Default)]
pub struct ParticleSampler {
    distributions: MemoCache<[u64; 4], LandingDistribution>,
}

impl ParticleSampler {
    /// Create a sampler with no cached distributions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Distribution for `params`, built on first use.
    pub fn distribution(
        &mut self,
        params: &SimulationParams,
        model: &mut IntensityModel,
    ) -> Result<&LandingDistribution, SampleError> {
        self.distributions
            .try_get_or_insert_with(params.key(), || LandingDistribution::build(model, params))
    }

    /// Draw one landing row for a particle leaving the slit at
    /// `start_slit_y`.
    pub fn sample<R: Rng + ?Sized>(
        &mut self,
        start_slit_y: f64,
        params: &SimulationParams,
        threshold: f64,
        model: &mut IntensityModel,
        rng: &mut R,
    ) -> Result<ParticleSample, SampleError> {
        let u: f64 = rng.gen_range(0.0..1.0);
        let row = self.distribution(params, model)?.sample_row(u);
        let end_y = row as f64;
        let geometry = *model.geometry();
        let should_show = model.intensity(params, end_y) > threshold;
        let angle = (end_y - start_slit_y).atan2(geometry.propagation_distance(params));
        crate::trace!(row, should_show, "particle sampled");
        Ok(ParticleSample {
            end_y,
            should_show,
            angle,
        })
    }

    /// Drop every cached distribution.
    pub fn reset(&mut self) {
        self.distributions.reset();
    }

    /// Distribution cache counters.
    pub fn stats(&self) -> CacheStats {
        self.distributions.stats()
    }
}
