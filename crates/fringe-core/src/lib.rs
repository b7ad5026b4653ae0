#![forbid(unsafe_code)]

//! Core: bench geometry, optical parameters, and the double-slit kernel.
//!
//! # Role in Fringe
//! `fringe-core` holds everything with numerical content: the intensity
//! model, the landing sampler built on it, and the memo caches that keep
//! per-frame evaluation cheap. It has no notion of pixels; `fringe-render`
//! turns its outputs into colors and `fringe-runtime` drives it per frame.

pub mod geometry;
pub mod intensity;
pub mod logging;
pub mod memo;
pub mod params;
pub mod sampler;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace};

pub use geometry::{Rect, SceneGeometry};
pub use intensity::{IntensityModel, diffraction_factor, interference_factor};
pub use memo::{CacheStats, MemoCache};
pub use params::{Controls, Mode, ParamError, SimulationParams};
pub use sampler::{LandingDistribution, ParticleSample, ParticleSampler, SampleError};
