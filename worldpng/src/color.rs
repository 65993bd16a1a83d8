//! Value-to-colour mapping.
//!
//! Every layer is normalised linearly from its own [`ValueRange`] onto a
//! 0-255 grey level. The overlay policy used for rivers and lakes additionally
//! treats `0` as "no feature here" and renders it fully transparent.

use crate::matrix::ValueRange;

/// An 8-bit RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0 = invisible, 255 = opaque
    pub a: u8,
}

impl Pixel {
    /// Background marker for overlay cells without a feature.
    pub const TRANSPARENT: Pixel = Pixel {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque grey pixel with the given intensity on all three channels.
    pub const fn gray(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
            a: u8::MAX,
        }
    }

    /// Pack the colour channels as `0xRRGGBB`, dropping alpha.
    pub fn to_rgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Returns true unless the pixel is fully transparent.
    pub fn is_visible(self) -> bool {
        self.a != 0
    }
}

/// How cell values become pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPolicy {
    /// Linear greyscale between the matrix minimum (black) and maximum (white).
    #[default]
    Grayscale,
    /// Like [`RenderPolicy::Grayscale`], but a cell of exactly `0` renders as
    /// [`Pixel::TRANSPARENT`]. Used for categorical overlays.
    ZeroIsTransparent,
}

impl RenderPolicy {
    /// Map a single cell value to a pixel.
    pub fn color(self, value: f64, range: ValueRange) -> Pixel {
        match self {
            RenderPolicy::Grayscale => Pixel::gray(level(value, range)),
            RenderPolicy::ZeroIsTransparent => {
                if value == 0.0 {
                    Pixel::TRANSPARENT
                } else {
                    Pixel::gray(level(value, range))
                }
            }
        }
    }

    /// Whether rasters drawn with this policy need an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, RenderPolicy::ZeroIsTransparent)
    }
}

/// Normalise `value` within `range` to a grey level.
///
/// Rounds half up, so a value exactly halfway between two levels takes the
/// upper one. A degenerate range (`min == max`) and NaN both map to 0.
pub fn level(value: f64, range: ValueRange) -> u8 {
    if range.is_degenerate() || value.is_nan() {
        return 0;
    }

    let span = range.span();
    let scaled = if span.is_finite() {
        (value - range.min) * 255.0 / span
    } else {
        // max - min overflowed; halving both ends keeps the spread finite
        let half_span = range.max * 0.5 - range.min * 0.5;
        (value * 0.5 - range.min * 0.5) / half_span * 255.0
    };
    (scaled + 0.5).floor().clamp(0.0, 255.0) as u8
}
