use crate::{
    assets::{source::SourceImage, store::AssetSource},
    buffer::pixel::PixelBuffer,
    color::{depth::BitDepth, space::ColorSpace},
    convert::format,
    foundation::{
        core::PixelSize,
        error::{ConversionStep, LucentError, LucentResult, abort_with},
    },
    gpu::{context::RenderContext, texture::GpuTexture},
    render::composite::composite,
};

/// Foreground plus the optional displacement map and blur mask of one overlay.
///
/// Color space, size and bit depth always come from the foreground. Map and
/// mask dimensions are not checked; they are sampled by normalized coordinates.
#[derive(Debug)]
pub struct InputImage {
    foreground: PixelBuffer,
    map: Option<PixelBuffer>,
    blur: Option<PixelBuffer>,
}

/// Textures bound for one draw call.
pub(crate) struct BoundTextures<'a> {
    pub foreground: &'a GpuTexture,
    pub map: Option<&'a GpuTexture>,
    pub blur: Option<&'a GpuTexture>,
}

impl InputImage {
    /// Descriptor with only a foreground.
    pub fn new(foreground: PixelBuffer) -> Self {
        Self {
            foreground,
            map: None,
            blur: None,
        }
    }

    /// Attach a displacement map.
    pub fn with_map(mut self, map: PixelBuffer) -> Self {
        self.map = Some(map);
        self
    }

    /// Attach a blur mask.
    pub fn with_blur(mut self, blur: PixelBuffer) -> Self {
        self.blur = Some(blur);
        self
    }

    /// Build from decoded images, each deriving its own metadata.
    pub fn from_images(
        foreground: SourceImage,
        map: Option<SourceImage>,
        blur: Option<SourceImage>,
    ) -> LucentResult<Self> {
        Ok(Self {
            foreground: PixelBuffer::from_image(foreground)?,
            map: map.map(PixelBuffer::from_image).transpose()?,
            blur: blur.map(PixelBuffer::from_image).transpose()?,
        })
    }

    /// Build from textures that all hold values in `color_space`.
    ///
    /// [`ColorSpace::Linear`] is the usual choice for textures produced on the GPU.
    pub fn from_textures(
        foreground: GpuTexture,
        map: Option<GpuTexture>,
        blur: Option<GpuTexture>,
        color_space: ColorSpace,
    ) -> Self {
        let wrap = |t: GpuTexture| PixelBuffer::from_texture(t, color_space);
        Self {
            foreground: wrap(foreground),
            map: map.map(wrap),
            blur: blur.map(wrap),
        }
    }

    /// Build from named assets.
    ///
    /// Fails with [`LucentError::AssetNotFound`] for any name the source lacks.
    pub fn try_named(
        assets: &dyn AssetSource,
        name: &str,
        map: Option<&str>,
        blur: Option<&str>,
    ) -> LucentResult<Self> {
        let load = |name: &str| load_named(assets, name);
        Self::from_images(
            load(name)?,
            map.map(load).transpose()?,
            blur.map(load).transpose()?,
        )
    }

    /// [`InputImage::try_named`] that aborts the process on failure.
    pub fn named(
        assets: &dyn AssetSource,
        name: &str,
        map: Option<&str>,
        blur: Option<&str>,
    ) -> Self {
        match Self::try_named(assets, name, map, blur) {
            Ok(input) => input,
            Err(err) => abort_with(&format!("input image '{name}'"), &err),
        }
    }

    /// Foreground buffer.
    pub fn foreground(&self) -> &PixelBuffer {
        &self.foreground
    }

    /// Displacement map, if any.
    pub fn map(&self) -> Option<&PixelBuffer> {
        self.map.as_ref()
    }

    /// Blur mask, if any.
    pub fn blur(&self) -> Option<&PixelBuffer> {
        self.blur.as_ref()
    }

    /// Color space of the foreground.
    pub fn color_space(&self) -> ColorSpace {
        self.foreground.color_space()
    }

    /// Size of the foreground.
    pub fn size(&self) -> PixelSize {
        self.foreground.size()
    }

    /// Bit depth of the foreground.
    pub fn bit_depth(&self) -> BitDepth {
        self.foreground.bit_depth()
    }

    /// Make sure every buffer the draw call reads has a texture.
    pub(crate) fn bind_textures(
        &mut self,
        ctx: &RenderContext,
        with_blur: bool,
    ) -> LucentResult<BoundTextures<'_>> {
        let Self {
            foreground,
            map,
            blur,
        } = self;
        let foreground = foreground.texture(ctx)?;
        let map = match map {
            Some(map) => Some(map.texture(ctx)?),
            None => None,
        };
        let blur = match blur {
            Some(blur) if with_blur => Some(blur.texture(ctx)?),
            _ => None,
        };
        Ok(BoundTextures {
            foreground,
            map,
            blur,
        })
    }

    /// Composite this input over `background` and decode the result.
    pub fn try_layer_over(
        &mut self,
        ctx: &RenderContext,
        background: SourceImage,
    ) -> LucentResult<SourceImage> {
        let background = PixelBuffer::from_image(background)?;
        let target = composite(ctx, self, background)?;
        format::image_from_texture(ctx, &target, self.color_space()).map_err(|e| match e {
            LucentError::Conversion { detail, .. } => {
                LucentError::conversion(ConversionStep::TextureToImage, detail)
            }
            other => other,
        })
    }

    /// Composite this input over a background texture holding values in the
    /// input's color space.
    pub fn try_layer_over_texture(
        &mut self,
        ctx: &RenderContext,
        background: GpuTexture,
    ) -> LucentResult<GpuTexture> {
        let background = PixelBuffer::from_texture(background, self.color_space());
        composite(ctx, self, background)
    }

    /// Composite this input over the background asset called `name`.
    ///
    /// Fails with [`LucentError::AssetNotFound`] before any GPU work when the
    /// source lacks `name`.
    pub fn try_layer_over_named(
        &mut self,
        ctx: &RenderContext,
        assets: &dyn AssetSource,
        name: &str,
    ) -> LucentResult<SourceImage> {
        let background = load_named(assets, name)?;
        self.try_layer_over(ctx, background)
    }

    /// [`InputImage::try_layer_over`] that aborts the process on failure.
    pub fn layer_over(&mut self, ctx: &RenderContext, background: SourceImage) -> SourceImage {
        match self.try_layer_over(ctx, background) {
            Ok(image) => image,
            Err(err) => abort_with("layer over image", &err),
        }
    }

    /// [`InputImage::try_layer_over_named`] that aborts the process on failure.
    pub fn layer_over_named(
        &mut self,
        ctx: &RenderContext,
        assets: &dyn AssetSource,
        name: &str,
    ) -> SourceImage {
        match self.try_layer_over_named(ctx, assets, name) {
            Ok(image) => image,
            Err(err) => abort_with(&format!("layer over '{name}'"), &err),
        }
    }

    /// [`InputImage::try_layer_over_texture`] that aborts the process on failure.
    pub fn layer_over_texture(&mut self, ctx: &RenderContext, background: GpuTexture) -> GpuTexture {
        match self.try_layer_over_texture(ctx, background) {
            Ok(texture) => texture,
            Err(err) => abort_with("layer over texture", &err),
        }
    }
}

fn load_named(assets: &dyn AssetSource, name: &str) -> LucentResult<SourceImage> {
    assets
        .load(name)?
        .ok_or_else(|| LucentError::AssetNotFound(name.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/input.rs"]
mod tests;
