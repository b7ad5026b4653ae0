#![forbid(unsafe_code)]

//! Presentation: handing a finished frame to the visible target.

use crate::surface::Surface;
use std::io;

/// A visible target that finished frames are blitted onto.
///
/// Implementations must not keep a reference to `frame` past the call.
pub trait Present {
    /// Show `frame`. Called once per completed frame, after the swap.
    fn present(&mut self, frame: &Surface) -> io::Result<()>;
}

/// Headless presenter that keeps a copy of the most recent frame.
#[derive(Debug, Clone, Default)]
pub struct CapturePresenter {
    last: Option<Surface>,
    presented: u64,
}

impl CapturePresenter {
    /// Create a presenter with nothing captured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently presented frame.
    pub fn last_frame(&self) -> Option<&Surface> {
        self.last.as_ref()
    }

    /// Number of frames presented so far.
    pub fn frame_count(&self) -> u64 {
        self.presented
    }
}

impl Present for CapturePresenter {
    fn present(&mut self, frame: &Surface) -> io::Result<()> {
        let reused = self
            .last
            .as_mut()
            .is_some_and(|last| last.copy_from(frame));
        if !reused {
            self.last = Some(frame.clone());
        }
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PackedRgba;

    #[test]
    fn capture_keeps_latest_frame() {
        let mut presenter = CapturePresenter::new();
        let mut frame = Surface::new(2, 1);
        presenter.present(&frame).unwrap();
        frame.set(1, 0, PackedRgba::WHITE);
        presenter.present(&frame).unwrap();
        assert_eq!(presenter.frame_count(), 2);
        assert_eq!(presenter.last_frame(), Some(&frame));
    }

    #[test]
    fn capture_handles_size_change() {
        let mut presenter = CapturePresenter::new();
        presenter.present(&Surface::new(2, 2)).unwrap();
        presenter.present(&Surface::new(3, 1)).unwrap();
        assert_eq!(presenter.last_frame().map(Surface::width), Some(3));
    }
}
