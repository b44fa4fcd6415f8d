//! Public overlay entry points.
//!
//! Each shape comes in two tiers: `try_*` returns the specific
//! [`LucentError`](crate::LucentError), the plain variant logs it and aborts.

use crate::{
    assets::source::SourceImage,
    buffer::{input::InputImage, pixel::PixelBuffer},
    color::space::ColorSpace,
    foundation::error::{LucentResult, abort_with},
    gpu::{context::RenderContext, texture::GpuTexture},
    render::composite::composite,
};

/// Composite `foreground` (with optional map and blur mask) over `background`.
///
/// The result has the background's size, the foreground's bit depth and is
/// tagged with the foreground's color space.
pub fn try_render_overlay(
    ctx: &RenderContext,
    foreground: SourceImage,
    background: SourceImage,
    map: Option<SourceImage>,
    blur: Option<SourceImage>,
) -> LucentResult<SourceImage> {
    let mut input = InputImage::from_images(foreground, map, blur)?;
    input.try_layer_over(ctx, background)
}

/// [`try_render_overlay`] that aborts the process on failure.
pub fn render_overlay(
    ctx: &RenderContext,
    foreground: SourceImage,
    background: SourceImage,
    map: Option<SourceImage>,
    blur: Option<SourceImage>,
) -> SourceImage {
    match try_render_overlay(ctx, foreground, background, map, blur) {
        Ok(image) => image,
        Err(err) => abort_with("render overlay", &err),
    }
}

/// Composite `input` over a background texture whose values are in `color_space`.
pub fn try_render_overlay_texture(
    ctx: &RenderContext,
    input: &mut InputImage,
    background: GpuTexture,
    color_space: ColorSpace,
) -> LucentResult<GpuTexture> {
    composite(ctx, input, PixelBuffer::from_texture(background, color_space))
}

/// [`try_render_overlay_texture`] that aborts the process on failure.
pub fn render_overlay_texture(
    ctx: &RenderContext,
    input: &mut InputImage,
    background: GpuTexture,
    color_space: ColorSpace,
) -> GpuTexture {
    match try_render_overlay_texture(ctx, input, background, color_space) {
        Ok(texture) => texture,
        Err(err) => abort_with("render overlay texture", &err),
    }
}
