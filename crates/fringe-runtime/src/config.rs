#![forbid(unsafe_code)]

//! Runtime configuration.
//!
//! Every knob has a default that reproduces the reference look. Hosts can
//! override them through `FRINGE_*` environment variables; values are
//! trimmed, empty values are ignored, malformed ones are reported.
//! [`env_string`] and [`env_parse`] are shared with hosts that read their
//! own variables.

use fringe_core::geometry::SceneGeometry;
use std::fmt;
use std::time::Duration;

/// Probability that a frame emits a new particle.
pub const DEFAULT_EMISSION_PROBABILITY: f64 = 0.3;
/// Accumulated points below this intensity fade out. Distinct from the
/// emission threshold supplied by the controls.
pub const DEFAULT_PERSISTENCE_THRESHOLD: f64 = 0.1;
/// Rows between intensity samples in the wave-mode strip.
pub const DEFAULT_STRIP_ROW_STEP: u16 = 4;
/// Target frame interval (~60 Hz).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(16);

/// Tunables for the frame loop and renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Canvas size and plane positions.
    pub geometry: SceneGeometry,
    /// Per-frame emission coin-flip probability, in `[0, 1]`.
    pub emission_probability: f64,
    /// Minimum intensity for an accumulated point to stay visible.
    pub persistence_threshold: f64,
    /// Row step of the wave-mode intensity strip (at least 1).
    pub strip_row_step: u16,
    /// Width of intensity and accumulation strips, in pixels.
    pub strip_width: f64,
    /// Wavefront spacing is `wavelength_nm / wavefront_divisor` pixels.
    pub wavefront_divisor: f64,
    /// Wavefront drift per frame, in pixels.
    pub wave_speed: f64,
    /// Radius of an in-flight particle dot.
    pub particle_radius: f64,
    /// Interval between frames for paced schedulers.
    pub refresh_interval: Duration,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            geometry: SceneGeometry::DEFAULT,
            emission_probability: DEFAULT_EMISSION_PROBABILITY,
            persistence_threshold: DEFAULT_PERSISTENCE_THRESHOLD,
            strip_row_step: DEFAULT_STRIP_ROW_STEP,
            strip_width: 10.0,
            wavefront_divisor: 20.0,
            wave_speed: 1.0,
            particle_radius: 1.5,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Builder-style seed override.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through an arbitrary lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(width) = env_parse::<u16>(&lookup, "FRINGE_CANVAS_WIDTH")? {
            config.geometry.width = width;
        }
        if let Some(height) = env_parse::<u16>(&lookup, "FRINGE_CANVAS_HEIGHT")? {
            config.geometry.height = height;
        }
        if let Some(p) = env_parse::<f64>(&lookup, "FRINGE_EMISSION_PROBABILITY")? {
            config.emission_probability = unit_range(p, "FRINGE_EMISSION_PROBABILITY")?;
        }
        if let Some(t) = env_parse::<f64>(&lookup, "FRINGE_PERSISTENCE_THRESHOLD")? {
            config.persistence_threshold = unit_range(t, "FRINGE_PERSISTENCE_THRESHOLD")?;
        }
        if let Some(step) = env_parse::<u16>(&lookup, "FRINGE_STRIP_ROW_STEP")? {
            if step == 0 {
                let reason = "must be at least 1";
                return Err(ConfigError::invalid("FRINGE_STRIP_ROW_STEP", "0", reason));
            }
            config.strip_row_step = step;
        }
        if let Some(ms) = env_parse::<u64>(&lookup, "FRINGE_REFRESH_MS")? {
            if ms == 0 {
                return Err(ConfigError::invalid("FRINGE_REFRESH_MS", "0", "must be positive"));
            }
            config.refresh_interval = Duration::from_millis(ms);
        }
        if let Some(w) = env_parse::<f64>(&lookup, "FRINGE_STRIP_WIDTH")? {
            config.strip_width = positive(w, "FRINGE_STRIP_WIDTH")?;
        }
        if let Some(d) = env_parse::<f64>(&lookup, "FRINGE_WAVEFRONT_DIVISOR")? {
            config.wavefront_divisor = positive(d, "FRINGE_WAVEFRONT_DIVISOR")?;
        }
        if let Some(v) = env_parse::<f64>(&lookup, "FRINGE_WAVE_SPEED")? {
            config.wave_speed = positive(v, "FRINGE_WAVE_SPEED")?;
        }
        if let Some(r) = env_parse::<f64>(&lookup, "FRINGE_PARTICLE_RADIUS")? {
            config.particle_radius = positive(r, "FRINGE_PARTICLE_RADIUS")?;
        }
        config.seed = env_parse::<u64>(&lookup, "FRINGE_SEED")?;
        Ok(config)
    }
}

/// Trimmed value of `name`; empty values count as unset.
pub fn env_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parsed value of `name`, or `None` when unset.
pub fn env_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env_string(lookup, name) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::invalid(name, &value, "could not be parsed")),
    }
}

fn unit_range(value: f64, name: &'static str) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::invalid(name, &value.to_string(), "must lie in [0, 1]"))
    }
}

fn positive(value: f64, name: &'static str) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(name, &value.to_string(), "must be positive"))
    }
}

/// A configuration override that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Variable name.
    pub var: &'static str,
    /// Offending value.
    pub value: String,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl ConfigError {
    /// Build an error for `var = value`.
    pub fn invalid(var: &'static str, value: &str, reason: &'static str) -> Self {
        Self {
            var,
            value: value.to_string(),
            reason,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}: {}", self.var, self.value, self.reason)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn overrides_apply() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("FRINGE_EMISSION_PROBABILITY", " 0.5 "),
            ("FRINGE_SEED", "42"),
            ("FRINGE_REFRESH_MS", "33"),
            ("FRINGE_CANVAS_HEIGHT", "200"),
        ]))
        .unwrap();
        assert_eq!(config.emission_probability, 0.5);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.refresh_interval, Duration::from_millis(33));
        assert_eq!(config.geometry.height, 200);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = RuntimeConfig::from_lookup(lookup(&[("FRINGE_SEED", "   ")])).unwrap();
        assert_eq!(config.seed, None);
    }

    #[test]
    fn malformed_values_are_reported() {
        let err = RuntimeConfig::from_lookup(lookup(&[("FRINGE_STRIP_ROW_STEP", "four")]))
            .unwrap_err();
        assert_eq!(err.var, "FRINGE_STRIP_ROW_STEP");
        assert_eq!(err.value, "four");
    }

    #[test]
    fn probability_must_be_unit_range() {
        let err = RuntimeConfig::from_lookup(lookup(&[("FRINGE_EMISSION_PROBABILITY", "1.5")]))
            .unwrap_err();
        assert_eq!(err.reason, "must lie in [0, 1]");
    }

    #[test]
    fn rendering_knobs_override() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("FRINGE_STRIP_WIDTH", "6"),
            ("FRINGE_WAVEFRONT_DIVISOR", "25.5"),
            ("FRINGE_WAVE_SPEED", "2"),
            ("FRINGE_PARTICLE_RADIUS", "3.0"),
        ]))
        .unwrap();
        assert_eq!(config.strip_width, 6.0);
        assert_eq!(config.wavefront_divisor, 25.5);
        assert_eq!(config.wave_speed, 2.0);
        assert_eq!(config.particle_radius, 3.0);
    }

    #[test]
    fn rendering_knobs_must_be_positive() {
        for (var, value) in [
            ("FRINGE_STRIP_WIDTH", "0"),
            ("FRINGE_WAVEFRONT_DIVISOR", "-20"),
            ("FRINGE_WAVE_SPEED", "inf"),
            ("FRINGE_PARTICLE_RADIUS", "NaN"),
        ] {
            let err = RuntimeConfig::from_lookup(lookup(&[(var, value)])).unwrap_err();
            assert_eq!(err.var, var);
            assert_eq!(err.reason, "must be positive");
        }
    }

    #[test]
    fn zero_row_step_rejected() {
        assert!(RuntimeConfig::from_lookup(lookup(&[("FRINGE_STRIP_ROW_STEP", "0")])).is_err());
    }
}
