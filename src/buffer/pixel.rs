use crate::{
    assets::source::SourceImage,
    color::{depth::BitDepth, space::ColorSpace},
    convert::{filter::FilterImage, format},
    foundation::{core::PixelSize, error::LucentResult},
    gpu::{context::RenderContext, texture::GpuTexture},
};

/// Authoritative representation a [`PixelBuffer`] was built from.
#[derive(Debug)]
pub enum PixelSource {
    /// Decoded bitmap.
    Image(SourceImage),
    /// GPU texture.
    Texture(GpuTexture),
}

/// 2D image data with a fixed size, bit depth and color space.
///
/// The buffer owns one authoritative [`PixelSource`]. The other representation
/// is produced on the first call to [`PixelBuffer::texture`] or
/// [`PixelBuffer::image`] and kept for the lifetime of the buffer; both take
/// `&mut self` because they populate that cache.
#[derive(Debug)]
pub struct PixelBuffer {
    source: PixelSource,
    size: PixelSize,
    bit_depth: BitDepth,
    color_space: ColorSpace,
    derived_image: Option<SourceImage>,
    derived_texture: Option<GpuTexture>,
}

impl PixelBuffer {
    /// Wrap a decoded image, deriving bit depth and color space from it.
    pub fn from_image(image: SourceImage) -> LucentResult<Self> {
        let bit_depth = image.bit_depth()?;
        let color_space = image.color_space()?;
        let size = image.size();
        size.ensure_non_empty()?;
        Ok(Self {
            source: PixelSource::Image(image),
            size,
            bit_depth,
            color_space,
            derived_image: None,
            derived_texture: None,
        })
    }

    /// Wrap a texture whose values are encoded in `color_space`.
    pub fn from_texture(texture: GpuTexture, color_space: ColorSpace) -> Self {
        Self {
            size: texture.size(),
            bit_depth: texture.bit_depth(),
            source: PixelSource::Texture(texture),
            color_space,
            derived_image: None,
            derived_texture: None,
        }
    }

    /// Pixel dimensions.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Channel precision.
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Color space the values are encoded in.
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// The authoritative representation.
    pub fn source(&self) -> &PixelSource {
        &self.source
    }

    /// GPU texture, uploading the image on first use.
    pub fn texture(&mut self, ctx: &RenderContext) -> LucentResult<&GpuTexture> {
        match &self.source {
            PixelSource::Texture(texture) => Ok(texture),
            PixelSource::Image(image) => {
                let texture = match self.derived_texture.take() {
                    Some(texture) => texture,
                    None => format::texture_from_image(ctx, image)?,
                };
                Ok(self.derived_texture.insert(texture))
            }
        }
    }

    /// Decoded image, reading the texture back on first use.
    pub fn image(&mut self, ctx: &RenderContext) -> LucentResult<&SourceImage> {
        match &self.source {
            PixelSource::Image(image) => Ok(image),
            PixelSource::Texture(texture) => {
                let image = match self.derived_image.take() {
                    Some(image) => image,
                    None => format::image_from_texture(ctx, texture, self.color_space)?,
                };
                Ok(self.derived_image.insert(image))
            }
        }
    }

    /// Texture if it is authoritative or already derived.
    pub fn cached_texture(&self) -> Option<&GpuTexture> {
        match &self.source {
            PixelSource::Texture(texture) => Some(texture),
            PixelSource::Image(_) => self.derived_texture.as_ref(),
        }
    }

    /// Image if it is authoritative or already derived.
    pub fn cached_image(&self) -> Option<&SourceImage> {
        match &self.source {
            PixelSource::Image(image) => Some(image),
            PixelSource::Texture(_) => self.derived_image.as_ref(),
        }
    }

    /// Filterable copy in the buffer's own color space.
    ///
    /// Prefers a CPU-side image so no readback happens when one exists.
    pub fn filter_image(&self, ctx: &RenderContext) -> LucentResult<FilterImage> {
        match (&self.source, self.derived_image.as_ref()) {
            (PixelSource::Image(image), _) | (_, Some(image)) => {
                FilterImage::from_source(image, self.color_space)
            }
            (PixelSource::Texture(texture), None) => {
                format::filter_from_texture(ctx, texture, self.color_space)
            }
        }
    }

    /// Consume into the authoritative representation.
    pub fn into_source(self) -> PixelSource {
        self.source
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
