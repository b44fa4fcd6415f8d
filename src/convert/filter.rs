use rayon::prelude::*;

use crate::{
    assets::source::SourceImage,
    color::space::{ColorSpace, Transfer},
    foundation::{
        core::PixelSize,
        error::{ConversionStep, LucentError, LucentResult},
    },
};

/// Filterable image: straight-alpha `f32` RGBA tagged with its color space.
///
/// This is the working representation of the blur stage and the bridge
/// between encoded images and GPU textures.
#[derive(Clone, Debug)]
pub struct FilterImage {
    pixels: image::Rgba32FImage,
    color_space: ColorSpace,
}

impl FilterImage {
    /// Wrap `f32` pixels whose values are encoded in `color_space`.
    pub fn new(pixels: image::Rgba32FImage, color_space: ColorSpace) -> Self {
        Self {
            pixels,
            color_space,
        }
    }

    /// Expand a source image, treating its values as `color_space`.
    pub fn from_source(src: &SourceImage, color_space: ColorSpace) -> LucentResult<Self> {
        if src.size().is_empty() {
            return Err(LucentError::conversion(
                ConversionStep::ImageToFilter,
                format!("empty image {}", src.size()),
            ));
        }
        Ok(Self::new(src.image().to_rgba32f(), color_space))
    }

    /// Pixel dimensions.
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.pixels.width(), self.pixels.height())
    }

    /// Color space the values are encoded in.
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Pixels.
    pub fn pixels(&self) -> &image::Rgba32FImage {
        &self.pixels
    }

    /// Consume into the pixels.
    pub fn into_pixels(self) -> image::Rgba32FImage {
        self.pixels
    }

    /// Re-encode the color channels for `target`. Alpha is untouched.
    ///
    /// Pairs involving Display P3 pass through unchanged with a warning.
    pub fn to_color_space(&self, target: ColorSpace) -> Self {
        let transfer = self.color_space.transfer_to(target);
        if transfer == Transfer::Unsupported {
            tracing::warn!(
                from = %self.color_space,
                to = %target,
                "color space conversion not implemented, passing pixels through"
            );
        }

        let mut pixels = self.pixels.clone();
        if !transfer.is_noop() {
            pixels.par_chunks_mut(4).for_each(|px| {
                for c in &mut px[..3] {
                    *c = transfer.apply(*c);
                }
            });
        }
        Self::new(pixels, target)
    }

    /// Top-left `size` region, clamped to the image.
    pub fn cropped(&self, size: PixelSize) -> Self {
        let own = self.size();
        if own == size {
            return self.clone();
        }
        let width = size.width.min(own.width);
        let height = size.height.min(own.height);
        let pixels = image::imageops::crop_imm(&self.pixels, 0, 0, width, height).to_image();
        Self::new(pixels, self.color_space)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/filter.rs"]
mod tests;
