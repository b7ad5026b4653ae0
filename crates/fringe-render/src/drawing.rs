#![forbid(unsafe_code)]

//! Drawing primitives for surfaces.
//!
//! Floating-point coordinates are in surface pixels; a point covers the pixel
//! its coordinates floor into. All primitives composite with SourceOver and
//! silently clip at the surface edge.

use crate::color::PackedRgba;
use crate::surface::Surface;
use fringe_core::geometry::Rect;

/// Extension trait for drawing on a [`Surface`].
pub trait Draw {
    /// Fill an axis-aligned rectangle given in floating-point coordinates.
    fn fill_rect_f64(&mut self, x: f64, y: f64, width: f64, height: f64, color: PackedRgba);

    /// Fill a disc centered at `(cx, cy)`.
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: PackedRgba);

    /// Stroke a circular arc from `start` to `end` radians (clockwise in
    /// screen space, 0 pointing right). Each pixel is touched at most once
    /// per call so translucent arcs do not darken where samples overlap.
    fn draw_arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: PackedRgba);
}

#[inline]
fn to_pixel(v: f64) -> Option<u16> {
    if !v.is_finite() || v < 0.0 || v >= f64::from(u16::MAX) {
        return None;
    }
    Some(v.floor() as u16)
}

impl Draw for Surface {
    fn fill_rect_f64(&mut self, x: f64, y: f64, width: f64, height: f64, color: PackedRgba) {
        let rect = Rect::from_f64_clipped(x, y, width, height, self.bounds());
        self.fill(rect, color);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: PackedRgba) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let r2 = radius * radius;
        let bounds = Rect::from_f64_clipped(
            cx - radius,
            cy - radius,
            radius * 2.0,
            radius * 2.0,
            self.bounds(),
        );
        for py in bounds.y..bounds.bottom() {
            for px in bounds.x..bounds.right() {
                let dx = f64::from(px) + 0.5 - cx;
                let dy = f64::from(py) + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn draw_arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: PackedRgba) {
        if !(radius.is_finite() && radius > 0.0) || !(end > start) {
            return;
        }
        // Half-pixel steps along the circumference. Revisits only happen
        // between neighbouring samples, so a short history is enough.
        let step = (0.5 / radius).min(0.1);
        let mut recent: [Option<(u16, u16)>; 4] = [None; 4];
        let mut slot = 0;
        let mut theta = start;
        while theta <= end {
            let x = cx + radius * theta.cos();
            let y = cy + radius * theta.sin();
            if let (Some(px), Some(py)) = (to_pixel(x), to_pixel(y))
                && !recent.contains(&Some((px, py)))
            {
                self.blend(px, py, color);
                recent[slot] = Some((px, py));
                slot = (slot + 1) % recent.len();
            }
            theta += step;
        }
    }
}
