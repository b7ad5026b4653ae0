#![forbid(unsafe_code)]

//! Pixel surfaces and double buffering.
//!
//! A [`Surface`] is a fixed-size row-major grid of [`PackedRgba`] pixels:
//! `index = y * width + x`. [`DoubleBuffer`] pairs two surfaces so a frame is
//! drawn off-screen and then made visible with an O(1) swap.
//!
//! # Invariants
//!
//! 1. `pixels.len() == width * height`
//! 2. Width and height never change after creation
//! 3. Out-of-bounds writes are ignored, never wrapped

use crate::color::PackedRgba;
use fringe_core::geometry::Rect;

/// A 2D grid of pixels.
///
/// # Example
///
/// ```
/// use fringe_render::color::PackedRgba;
/// use fringe_render::surface::Surface;
///
/// let mut surface = Surface::new(4, 2);
/// surface.set(1, 1, PackedRgba::WHITE);
/// assert_eq!(surface.get(1, 1), Some(PackedRgba::WHITE));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u16,
    height: u16,
    pixels: Vec<PackedRgba>,
}

impl Surface {
    /// Create a surface filled with transparent pixels.
    ///
    /// Zero-sized surfaces are allowed; every write to them is a no-op.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![PackedRgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Full surface bounds.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the surface has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`, or `None` out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<PackedRgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite the pixel at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, color: PackedRgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Composite `color` over the pixel at `(x, y)`.
    #[inline]
    pub fn blend(&mut self, x: u16, y: u16, color: PackedRgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// Composite `color` over every pixel of `rect` (clipped to bounds).
    pub fn fill(&mut self, rect: Rect, color: PackedRgba) {
        let clipped = rect.intersection(&self.bounds());
        if clipped.is_empty() {
            return;
        }
        let w = self.width as usize;
        for y in clipped.y..clipped.bottom() {
            let start = y as usize * w + clipped.x as usize;
            let end = start + clipped.width as usize;
            for px in &mut self.pixels[start..end] {
                *px = color.over(*px);
            }
        }
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.clear_with(PackedRgba::TRANSPARENT);
    }

    /// Reset every pixel to `color`.
    pub fn clear_with(&mut self, color: PackedRgba) {
        self.pixels.fill(color);
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    /// Copy all pixels from a surface of the same size.
    ///
    /// Returns `false` (and copies nothing) when the sizes differ.
    pub fn copy_from(&mut self, src: &Surface) -> bool {
        if src.width != self.width || src.height != self.height {
            return false;
        }
        self.pixels.copy_from_slice(&src.pixels);
        true
    }
}

/// Two same-sized surfaces with an O(1) swap.
///
/// Drawing targets the back surface; [`swap`](Self::swap) makes it the front
/// surface that presenters read.
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    buffers: [Surface; 2],
    /// Index of the back (off-screen) surface.
    back: usize,
}

impl DoubleBuffer {
    /// Create a pair of transparent surfaces.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffers: [Surface::new(width, height), Surface::new(width, height)],
            back: 0,
        }
    }

    /// Off-screen surface for the frame being drawn.
    #[inline]
    pub fn back_mut(&mut self) -> &mut Surface {
        &mut self.buffers[self.back]
    }

    /// Off-screen surface, read-only.
    #[inline]
    pub fn back(&self) -> &Surface {
        &self.buffers[self.back]
    }

    /// Last completed frame.
    #[inline]
    pub fn front(&self) -> &Surface {
        &self.buffers[1 - self.back]
    }

    /// Make the back surface visible.
    #[inline]
    pub fn swap(&mut self) {
        self.back = 1 - self.back;
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u16 {
        self.buffers[0].width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u16 {
        self.buffers[0].height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_transparent() {
        let s = Surface::new(3, 2);
        assert_eq!(s.len(), 6);
        assert!(s.pixels().iter().all(|p| *p == PackedRgba::TRANSPARENT));
    }

    #[test]
    fn zero_sized_surface_ignores_writes() {
        let mut s = Surface::new(0, 0);
        s.set(0, 0, PackedRgba::WHITE);
        s.fill(Rect::new(0, 0, 5, 5), PackedRgba::WHITE);
        assert!(s.is_empty());
        assert_eq!(s.get(0, 0), None);
    }

    #[test]
    fn out_of_bounds_set_is_ignored() {
        let mut s = Surface::new(2, 2);
        s.set(2, 0, PackedRgba::WHITE);
        s.set(0, 2, PackedRgba::WHITE);
        assert!(s.pixels().iter().all(|p| *p == PackedRgba::TRANSPARENT));
    }

    #[test]
    fn fill_clips_to_bounds() {
        let mut s = Surface::new(4, 4);
        s.fill(Rect::new(2, 2, 10, 10), PackedRgba::WHITE);
        assert_eq!(s.get(3, 3), Some(PackedRgba::WHITE));
        assert_eq!(s.get(1, 1), Some(PackedRgba::TRANSPARENT));
        let lit = s.pixels().iter().filter(|p| **p == PackedRgba::WHITE).count();
        assert_eq!(lit, 4);
    }

    #[test]
    fn blend_composites_over_existing() {
        let mut s = Surface::new(1, 1);
        s.set(0, 0, PackedRgba::rgb(0, 0, 255));
        s.blend(0, 0, PackedRgba::rgba(255, 0, 0, 128));
        assert_eq!(s.get(0, 0), Some(PackedRgba::rgba(128, 0, 127, 255)));
    }

    #[test]
    fn swap_exchanges_front_and_back() {
        let mut db = DoubleBuffer::new(2, 2);
        db.back_mut().set(0, 0, PackedRgba::WHITE);
        assert_eq!(db.front().get(0, 0), Some(PackedRgba::TRANSPARENT));
        db.swap();
        assert_eq!(db.front().get(0, 0), Some(PackedRgba::WHITE));
        assert_eq!(db.back().get(0, 0), Some(PackedRgba::TRANSPARENT));
    }

    #[test]
    fn copy_from_requires_same_size() {
        let mut a = Surface::new(2, 2);
        let mut b = Surface::new(2, 2);
        b.set(1, 1, PackedRgba::WHITE);
        assert!(a.copy_from(&b));
        assert_eq!(a, b);
        assert!(!a.copy_from(&Surface::new(3, 3)));
    }
}
