//! Color spaces and their transfer functions.
//!
//! Pixel data is never reinterpreted silently: every buffer carries exactly one
//! [`ColorSpace`], and moving between spaces goes through [`convert`] (or
//! [`FilterImage::to_color_space`](crate::FilterImage::to_color_space)).

use std::fmt;

use crate::{
    assets::source::SourceImage,
    buffer::pixel::PixelBuffer,
    color::depth::BitDepth,
    convert::{filter::FilterImage, format},
    foundation::error::{LucentError, LucentResult},
};

/// Physical identifier of linear-light sRGB primaries.
pub const LINEAR_SRGB_ID: &str = "srgb-linear";
/// Physical identifier of gamma-encoded sRGB.
pub const SRGB_ID: &str = "srgb";
/// Physical identifier of Display P3.
pub const DISPLAY_P3_ID: &str = "display-p3";

/// Supported color spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    /// sRGB primaries with a linear transfer function.
    Linear,
    /// sRGB primaries with the sRGB tone curve.
    Srgb,
    /// Display P3 primaries with the sRGB tone curve.
    DisplayP3,
}

impl ColorSpace {
    /// Every supported color space.
    pub const ALL: [ColorSpace; 3] = [Self::Linear, Self::Srgb, Self::DisplayP3];

    /// Physical identifier attached to images in this space.
    pub fn id(self) -> &'static str {
        match self {
            Self::Linear => LINEAR_SRGB_ID,
            Self::Srgb => SRGB_ID,
            Self::DisplayP3 => DISPLAY_P3_ID,
        }
    }

    /// Exact-match lookup of a physical color-space identifier.
    pub fn resolve(id: &str) -> LucentResult<Self> {
        Self::ALL
            .into_iter()
            .find(|space| space.id() == id)
            .ok_or_else(|| LucentError::unsupported(format!("color space '{id}'")))
    }

    /// Transfer needed to move pixel values from `self` into `target`.
    pub fn transfer_to(self, target: ColorSpace) -> Transfer {
        match (self, target) {
            (Self::Linear, Self::Srgb) => Transfer::Encode,
            (Self::Srgb, Self::Linear) => Transfer::Decode,
            (a, b) if a == b => Transfer::Identity,
            _ => Transfer::Unsupported,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Tone-curve operation between two color spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// Same space, values are kept.
    Identity,
    /// Linear to sRGB: forward tone curve.
    Encode,
    /// sRGB to linear: inverse tone curve.
    Decode,
    /// Not implemented yet (Display P3); values pass through unchanged.
    Unsupported,
}

impl Transfer {
    /// Apply to one color channel value in `[0, 1]`.
    #[inline]
    pub fn apply(self, v: f32) -> f32 {
        match self {
            Self::Identity | Self::Unsupported => v,
            Self::Encode => srgb_encode(v),
            Self::Decode => srgb_decode(v),
        }
    }

    /// True when pixel values are left unchanged.
    pub fn is_noop(self) -> bool {
        matches!(self, Self::Identity | Self::Unsupported)
    }
}

/// sRGB OETF: linear light to gamma-encoded (IEC 61966-2-1).
#[inline]
pub fn srgb_encode(l: f32) -> f32 {
    if l <= 0.003_130_8 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB EOTF: gamma-encoded to linear light (IEC 61966-2-1).
#[inline]
pub fn srgb_decode(v: f32) -> f32 {
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Move `image` from `source` to `target`, storing the result at `bit_depth`.
///
/// The input is left untouched. Display P3 pairs pass through with a warning.
pub fn convert(
    source: ColorSpace,
    target: ColorSpace,
    image: &SourceImage,
    bit_depth: BitDepth,
) -> LucentResult<PixelBuffer> {
    let filter = FilterImage::from_source(image, source)?;
    let converted = filter.to_color_space(target);
    let out = format::image_from_filter(&converted, bit_depth, target)?;
    PixelBuffer::from_image(out)
}

#[cfg(test)]
#[path = "../../tests/unit/color/space.rs"]
mod tests;
