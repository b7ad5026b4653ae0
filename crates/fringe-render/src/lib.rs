#![forbid(unsafe_code)]

//! Render kernel: spectral colors, pixel surfaces, drawing, and presentation.

pub mod color;
pub mod drawing;
pub mod present;
pub mod surface;

pub use color::{ColorMapper, PackedRgba, SpectralBand};
pub use drawing::Draw;
pub use present::{CapturePresenter, Present};
pub use surface::{DoubleBuffer, Surface};
