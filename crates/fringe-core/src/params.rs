#![forbid(unsafe_code)]

//! Per-frame simulation inputs.
//!
//! The control layer owns these values; the kernel receives them by value
//! once per frame and never mutates them.

use crate::geometry::SceneGeometry;
use std::fmt;
use std::str::FromStr;

/// Shortest visible wavelength, in nanometres.
pub const WAVELENGTH_MIN_NM: f64 = 380.0;
/// Longest visible wavelength, in nanometres.
pub const WAVELENGTH_MAX_NM: f64 = 750.0;

/// Optical parameters of the bench.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Wavelength in nanometres (visible range 380-750).
    pub wavelength_nm: f64,
    /// Width of each slit in micrometres.
    pub slit_width_um: f64,
    /// Center-to-center slit separation in micrometres.
    pub slit_distance_um: f64,
    /// Screen plane x in display units; must lie beyond the barrier.
    pub screen_distance: f64,
}

impl SimulationParams {
    /// Create parameters from raw values without validation.
    #[inline]
    pub const fn new(
        wavelength_nm: f64,
        slit_width_um: f64,
        slit_distance_um: f64,
        screen_distance: f64,
    ) -> Self {
        Self {
            wavelength_nm,
            slit_width_um,
            slit_distance_um,
            screen_distance,
        }
    }

    /// Check every constraint, reporting the first one violated.
    pub fn validate(&self, geometry: &SceneGeometry) -> Result<(), ParamError> {
        let fields = [
            ("wavelength", self.wavelength_nm),
            ("slit width", self.slit_width_um),
            ("slit distance", self.slit_distance_um),
            ("screen distance", self.screen_distance),
        ];
        if let Some((name, _)) = fields.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ParamError::NonFinite(name));
        }
        if !(WAVELENGTH_MIN_NM..=WAVELENGTH_MAX_NM).contains(&self.wavelength_nm) {
            return Err(ParamError::WavelengthOutOfRange(self.wavelength_nm));
        }
        if self.slit_width_um <= 0.0 {
            return Err(ParamError::NonPositiveSlitWidth(self.slit_width_um));
        }
        if self.slit_distance_um <= 0.0 {
            return Err(ParamError::NonPositiveSlitDistance(self.slit_distance_um));
        }
        if self.screen_distance <= geometry.barrier_x {
            return Err(ParamError::ScreenBeforeBarrier {
                screen_distance: self.screen_distance,
                barrier_x: geometry.barrier_x,
            });
        }
        Ok(())
    }

    /// Copy with the wavelength clamped into the visible range.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            wavelength_nm: clamp_wavelength(self.wavelength_nm),
            ..self
        }
    }

    /// Whether `other` moves the slits or the screen.
    ///
    /// In-flight particles were aimed with the old geometry and must be
    /// dropped when this returns `true`. Wavelength alone does not count.
    pub fn geometry_differs(&self, other: &Self) -> bool {
        self.slit_width_um.to_bits() != other.slit_width_um.to_bits()
            || self.slit_distance_um.to_bits() != other.slit_distance_um.to_bits()
            || self.screen_distance.to_bits() != other.screen_distance.to_bits()
    }

    /// Exact-match cache key over all four inputs.
    #[inline]
    pub fn key(&self) -> [u64; 4] {
        [
            self.wavelength_nm.to_bits(),
            self.slit_width_um.to_bits(),
            self.slit_distance_um.to_bits(),
            self.screen_distance.to_bits(),
        ]
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self::new(550.0, 2.0, 20.0, 500.0)
    }
}

/// Clamp a wavelength into `[380, 750]` nm. NaN passes through unchanged.
#[inline]
pub fn clamp_wavelength(wavelength_nm: f64) -> f64 {
    wavelength_nm.clamp(WAVELENGTH_MIN_NM, WAVELENGTH_MAX_NM)
}

/// Visualization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Continuous intensity field with animated wavefronts.
    #[default]
    Wave,
    /// Particle-by-particle accumulation on the screen.
    Particle,
}

impl Mode {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wave => "wave",
            Self::Particle => "particle",
        }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Wave => Self::Particle,
            Self::Particle => Self::Wave,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wave" => Ok(Self::Wave),
            "particle" => Ok(Self::Particle),
            _ => Err(ParamError::UnknownMode(s.to_string())),
        }
    }
}

/// Everything the control surface hands the kernel for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub params: SimulationParams,
    pub mode: Mode,
    /// Horizontal step per frame for newly emitted particles.
    pub particle_speed: f64,
    /// Emission cutoff: particles aimed at rows at or below this intensity
    /// are never emitted.
    pub intensity_threshold: f64,
}

impl Controls {
    /// Validate the optical parameters and the particle controls.
    pub fn validate(&self, geometry: &SceneGeometry) -> Result<(), ParamError> {
        self.params.validate(geometry)?;
        if !self.particle_speed.is_finite() || self.particle_speed <= 0.0 {
            return Err(ParamError::NonPositiveSpeed(self.particle_speed));
        }
        if !(0.0..=1.0).contains(&self.intensity_threshold) {
            return Err(ParamError::ThresholdOutOfRange(self.intensity_threshold));
        }
        Ok(())
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            params: SimulationParams::default(),
            mode: Mode::default(),
            particle_speed: 2.0,
            intensity_threshold: 0.05,
        }
    }
}

/// Invalid control input.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// A numeric input was NaN or infinite.
    NonFinite(&'static str),
    /// Wavelength outside the visible range.
    WavelengthOutOfRange(f64),
    /// Slit width was zero or negative.
    NonPositiveSlitWidth(f64),
    /// Slit separation was zero or negative.
    NonPositiveSlitDistance(f64),
    /// Screen plane at or before the barrier.
    ScreenBeforeBarrier { screen_distance: f64, barrier_x: f64 },
    /// Particle speed was zero, negative or non-finite.
    NonPositiveSpeed(f64),
    /// Emission threshold outside `[0, 1]`.
    ThresholdOutOfRange(f64),
    /// Mode name not recognized.
    UnknownMode(String),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(name) => write!(f, "{name} must be finite"),
            Self::WavelengthOutOfRange(v) => write!(
                f,
                "wavelength {v} nm outside [{WAVELENGTH_MIN_NM}, {WAVELENGTH_MAX_NM}]"
            ),
            Self::NonPositiveSlitWidth(v) => write!(f, "slit width must be positive, got {v}"),
            Self::NonPositiveSlitDistance(v) => {
                write!(f, "slit distance must be positive, got {v}")
            }
            Self::ScreenBeforeBarrier {
                screen_distance,
                barrier_x,
            } => write!(
                f,
                "screen distance {screen_distance} must exceed barrier position {barrier_x}"
            ),
            Self::NonPositiveSpeed(v) => write!(f, "particle speed must be positive, got {v}"),
            Self::ThresholdOutOfRange(v) => write!(f, "threshold {v} outside [0, 1]"),
            Self::UnknownMode(s) => write!(f, "unknown mode {s:?} (expected wave or particle)"),
        }
    }
}

impl std::error::Error for ParamError {}
