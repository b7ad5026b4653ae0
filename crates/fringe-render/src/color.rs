#![forbid(unsafe_code)]

//! Colors and the wavelength-to-RGB mapping.
//!
//! [`PackedRgba`] stores straight (non-premultiplied) alpha in one `u32`.
//! [`ColorMapper`] turns a wavelength into a display color with seven
//! spectral bands and linear ramps between neighbours. Intensity becomes the
//! alpha channel; it never scales brightness.

use fringe_core::memo::{CacheStats, MemoCache, f64_key};
use fringe_core::params::clamp_wavelength;

/// A packed RGBA color: `0xRRGGBBAA`.
///
/// Straight alpha; compositing uses Porter-Duff SourceOver (`src over dst`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Create a color from unit-range channels. Out-of-range and NaN
    /// channels saturate to the nearest bound (NaN to 0).
    #[inline]
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::rgba(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b), unit_to_u8(a))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    const fn div_round_u8(numer: u64, denom: u64) -> u8 {
        debug_assert!(denom != 0);
        let v = (numer + (denom / 2)) / denom;
        if v > 255 { 255 } else { v as u8 }
    }

    /// Porter-Duff SourceOver: `src over dst`.
    ///
    /// Computed in exact rational form and rounded once at the end.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        let s_a = self.a() as u64;
        if s_a == 255 {
            return self;
        }
        if s_a == 0 {
            return dst;
        }

        let d_a = dst.a() as u64;
        let inv_s_a = 255 - s_a;
        let numer_a = 255 * s_a + d_a * inv_s_a;
        if numer_a == 0 {
            return Self::TRANSPARENT;
        }

        let out_a = Self::div_round_u8(numer_a, 255);
        let channel = |s: u8, d: u8| {
            Self::div_round_u8(
                (s as u64) * s_a * 255 + (d as u64) * d_a * inv_s_a,
                numer_a,
            )
        };
        Self::rgba(
            channel(self.r(), dst.r()),
            channel(self.g(), dst.g()),
            channel(self.b(), dst.b()),
            out_a,
        )
    }
}

#[inline]
fn unit_to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Region of the visible spectrum, bounded at 440, 490, 510, 580 and 645 nm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectralBand {
    /// 380..440 nm: red fades out over full blue.
    Violet,
    /// 440..490 nm: green ramps up over full blue.
    Blue,
    /// 490..510 nm: blue fades out over full green.
    Cyan,
    /// 510..580 nm: red ramps up over full green.
    Green,
    /// 580..645 nm: green fades out over full red.
    Yellow,
    /// 645..=750 nm: pure red.
    Red,
    /// Not a number; renders black.
    Outside,
}

impl SpectralBand {
    /// Classify a wavelength after clamping it into the visible range.
    pub fn classify(wavelength_nm: f64) -> Self {
        let w = clamp_wavelength(wavelength_nm);
        if w.is_nan() {
            Self::Outside
        } else if w < 440.0 {
            Self::Violet
        } else if w < 490.0 {
            Self::Blue
        } else if w < 510.0 {
            Self::Cyan
        } else if w < 580.0 {
            Self::Green
        } else if w < 645.0 {
            Self::Yellow
        } else {
            Self::Red
        }
    }
}

/// Unit-range RGB for a wavelength (clamped to 380-750 nm first).
pub fn wavelength_to_rgb(wavelength_nm: f64) -> (f64, f64, f64) {
    let w = clamp_wavelength(wavelength_nm);
    match SpectralBand::classify(w) {
        SpectralBand::Violet => (-(w - 440.0) / (440.0 - 380.0), 0.0, 1.0),
        SpectralBand::Blue => (0.0, (w - 440.0) / (490.0 - 440.0), 1.0),
        SpectralBand::Cyan => (0.0, 1.0, -(w - 510.0) / (510.0 - 490.0)),
        SpectralBand::Green => ((w - 510.0) / (580.0 - 510.0), 1.0, 0.0),
        SpectralBand::Yellow => (1.0, -(w - 645.0) / (645.0 - 580.0), 0.0),
        SpectralBand::Red => (1.0, 0.0, 0.0),
        SpectralBand::Outside => (0.0, 0.0, 0.0),
    }
}

/// Uncached color for `(wavelength, intensity)`; intensity is the alpha.
pub fn spectral_color(wavelength_nm: f64, intensity: f64) -> PackedRgba {
    let (r, g, b) = wavelength_to_rgb(wavelength_nm);
    PackedRgba::from_unit(r, g, b, intensity)
}

/// Memoized wavelength-to-color service.
#[derive(Debug, Clone, Default)]
pub struct ColorMapper {
    cache: MemoCache<[u64; 2], PackedRgba>,
}

impl ColorMapper {
    /// Create a mapper with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `wavelength_nm` with `intensity` as opacity.
    pub fn to_color(&mut self, wavelength_nm: f64, intensity: f64) -> PackedRgba {
        *self
            .cache
            .get_or_insert_with([f64_key(wavelength_nm), f64_key(intensity)], || {
                spectral_color(wavelength_nm, intensity)
            })
    }

    /// Fully opaque color for `wavelength_nm`.
    #[inline]
    pub fn to_opaque(&mut self, wavelength_nm: f64) -> PackedRgba {
        self.to_color(wavelength_nm, 1.0)
    }

    /// Drop every cached color.
    pub fn reset(&mut self) {
        fringe_core::debug!(entries = self.cache.len(), "color cache reset");
        self.cache.reset();
    }

    /// Cache counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
