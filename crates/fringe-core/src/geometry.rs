#![forbid(unsafe_code)]

//! Geometric primitives and the fixed layout of the optical bench.
//!
//! Simulation space is measured in logical canvas pixels with the origin at
//! the top-left. The source, barrier and screen are vertical planes at fixed
//! x positions; only the screen moves (it sits at `screen_distance`).

use crate::params::SimulationParams;

/// An axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersection of two rectangles (empty if disjoint).
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::default();
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Build a rectangle from floating-point bounds, clipped to `bounds`.
    ///
    /// Negative or non-finite coordinates collapse to an empty rectangle
    /// instead of wrapping.
    pub fn from_f64_clipped(x: f64, y: f64, width: f64, height: f64, bounds: Rect) -> Rect {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return Rect::default();
        }
        let x0 = x.floor().max(0.0);
        let y0 = y.floor().max(0.0);
        let x1 = (x + width).ceil().min(f64::from(u16::MAX));
        let y1 = (y + height).ceil().min(f64::from(u16::MAX));
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16).intersection(&bounds)
    }
}

/// Default logical canvas width.
pub const CANVAS_WIDTH: u16 = 800;
/// Default logical canvas height.
pub const CANVAS_HEIGHT: u16 = 400;
/// Default x position of the light source marker.
pub const SOURCE_X: f64 = 50.0;
/// Default x position of the slit barrier.
pub const BARRIER_X: f64 = 200.0;
/// Default display size of one micrometre of slit geometry.
pub const SLIT_PIXELS_PER_MICRON: f64 = 2.0;
/// Default right-hand margin kept free when scaling the screen into view.
pub const SCREEN_MARGIN: f64 = 40.0;

/// Fixed layout of the bench: canvas size and plane positions.
///
/// Everything here is constant for the lifetime of a simulation instance;
/// per-frame inputs live in [`SimulationParams`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneGeometry {
    /// Canvas width in logical pixels.
    pub width: u16,
    /// Canvas height in logical pixels. Also the number of screen rows.
    pub height: u16,
    /// Source marker x.
    pub source_x: f64,
    /// Barrier plane x.
    pub barrier_x: f64,
    /// Pixels drawn per micrometre of slit width/separation.
    pub slit_pixels_per_micron: f64,
    /// Margin between the scaled screen line and the right canvas edge.
    pub screen_margin: f64,
}

impl SceneGeometry {
    /// The default 800x400 bench.
    pub const DEFAULT: Self = Self {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        source_x: SOURCE_X,
        barrier_x: BARRIER_X,
        slit_pixels_per_micron: SLIT_PIXELS_PER_MICRON,
        screen_margin: SCREEN_MARGIN,
    };

    /// Full canvas bounds.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Vertical center of the canvas (optical axis).
    #[inline]
    pub fn center_y(&self) -> f64 {
        f64::from(self.height) / 2.0
    }

    /// Whether `y` lies on the canvas, edges included.
    #[inline]
    pub fn contains_y(&self, y: f64) -> bool {
        (0.0..=f64::from(self.height)).contains(&y)
    }

    /// Screen plane x in unscaled simulation space.
    #[inline]
    pub fn screen_x(&self, params: &SimulationParams) -> f64 {
        params.screen_distance
    }

    /// Horizontal distance from barrier to screen.
    #[inline]
    pub fn propagation_distance(&self, params: &SimulationParams) -> f64 {
        params.screen_distance - self.barrier_x
    }

    /// Horizontal scale that keeps the screen line on the canvas.
    ///
    /// Never magnifies: a screen that already fits is drawn 1:1.
    pub fn display_scale(&self, params: &SimulationParams) -> f64 {
        let usable = f64::from(self.width) - self.screen_margin;
        if params.screen_distance <= 0.0 || usable <= 0.0 {
            return 1.0;
        }
        (usable / params.screen_distance).min(1.0)
    }

    /// Drawn height of one slit gap, at least one pixel.
    pub fn slit_gap(&self, params: &SimulationParams) -> f64 {
        (params.slit_width_um * self.slit_pixels_per_micron).max(1.0)
    }

    /// Y centers of the two slits: `[upper, lower]`.
    pub fn slit_centers(&self, params: &SimulationParams) -> [f64; 2] {
        let half = params.slit_distance_um * self.slit_pixels_per_micron / 2.0;
        let center = self.center_y();
        [center - half, center + half]
    }
}

impl Default for SceneGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}
