#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! With the `tracing` feature the kernel forwards to the `tracing` macros.
//! Without it, no-op macros with the same names are exported so call sites
//! (`crate::debug!`, `crate::trace!`) compile either way.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }
}
