use std::{io::Cursor, path::Path};

use anyhow::Context;
use image::ImageDecoder as _;

use crate::{
    color::{depth::BitDepth, space::ColorSpace},
    foundation::{core::PixelSize, error::LucentResult},
};

/// Decoded bitmap image plus the physical identifier of its color space.
///
/// This is the "encoded image" side of every conversion: pixels stay in the
/// integer layout `image` decoded them to until they are uploaded or filtered.
#[derive(Clone, Debug)]
pub struct SourceImage {
    image: image::DynamicImage,
    color_space_id: String,
}

impl SourceImage {
    /// Wrap a decoded image tagged with a known color space.
    pub fn new(image: image::DynamicImage, color_space: ColorSpace) -> Self {
        Self::with_color_space_id(image, color_space.id())
    }

    /// Wrap a decoded image tagged with a raw color-space identifier.
    ///
    /// The identifier is only resolved when the image becomes a pixel buffer.
    pub fn with_color_space_id(image: image::DynamicImage, id: impl Into<String>) -> Self {
        Self {
            image,
            color_space_id: id.into(),
        }
    }

    /// Decode PNG/JPEG/... bytes.
    ///
    /// The color space comes from the embedded ICC profile when its
    /// description names Display P3 or a linear encoding; images without a
    /// profile, or with any other profile, are tagged sRGB.
    pub fn decode(bytes: &[u8]) -> LucentResult<Self> {
        Ok(decode_tagged(bytes).context("decode image from memory")?)
    }

    /// Read and decode an image file, tagged as in [`SourceImage::decode`].
    pub fn open(path: impl AsRef<Path>) -> LucentResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Ok(decode_tagged(&bytes).with_context(|| format!("decode image '{}'", path.display()))?)
    }

    /// Write the image as PNG, creating parent directories.
    pub fn save_png(&self, path: impl AsRef<Path>) -> LucentResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    /// Decoded pixels.
    pub fn image(&self) -> &image::DynamicImage {
        &self.image
    }

    /// Consume into the decoded pixels.
    pub fn into_image(self) -> image::DynamicImage {
        self.image
    }

    /// Raw color-space identifier.
    pub fn color_space_id(&self) -> &str {
        &self.color_space_id
    }

    /// Resolve the color-space identifier.
    pub fn color_space(&self) -> LucentResult<ColorSpace> {
        ColorSpace::resolve(&self.color_space_id)
    }

    /// Pixel dimensions.
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.image.width(), self.image.height())
    }

    /// Bits per color component of the decoded layout.
    pub fn bits_per_component(&self) -> u32 {
        let color = self.image.color();
        u32::from(color.bytes_per_pixel() / color.channel_count()) * 8
    }

    /// Resolve the bits-per-component value.
    pub fn bit_depth(&self) -> LucentResult<BitDepth> {
        BitDepth::from_bits_per_component(self.bits_per_component())
    }
}

fn decode_tagged(bytes: &[u8]) -> image::ImageResult<SourceImage> {
    let mut decoder = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let color_space = decoder
        .icc_profile()?
        .map_or(ColorSpace::Srgb, |icc| color_space_from_icc(&icc));
    let image = image::DynamicImage::from_decoder(decoder)?;
    Ok(SourceImage::new(image, color_space))
}

/// Classify an ICC profile by the text of its description tags.
///
/// `desc` tags are ASCII and `mluc` tags UTF-16BE; dropping NUL and other
/// non-printable bytes makes both searchable as plain text.
pub(crate) fn color_space_from_icc(icc: &[u8]) -> ColorSpace {
    let text: String = icc
        .iter()
        .filter(|b| b.is_ascii_graphic() || **b == b' ')
        .map(|b| char::from(b.to_ascii_lowercase()))
        .collect();
    let space = if text.contains("display p3") {
        ColorSpace::DisplayP3
    } else if text.contains("linear") {
        ColorSpace::Linear
    } else {
        ColorSpace::Srgb
    };
    tracing::debug!(color_space = space.id(), len = icc.len(), "classified icc profile");
    space
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
