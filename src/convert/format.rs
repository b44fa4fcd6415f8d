//! Conversions between encoded images, filterable images and GPU textures.
//!
//! Every conversion keeps pixel dimensions exactly. Color space and bit depth
//! are explicit parameters; only [`filter_from_image`] and
//! [`texture_from_image`] derive metadata from their source.

use crate::{
    assets::source::SourceImage,
    color::{depth::BitDepth, space::ColorSpace},
    convert::filter::FilterImage,
    foundation::{
        core::PixelSize,
        error::{ConversionStep, LucentError, LucentResult},
    },
    gpu::{context::RenderContext, texture::GpuTexture},
};

/// Upload an encoded image at its own bit depth.
pub fn texture_from_image(ctx: &RenderContext, src: &SourceImage) -> LucentResult<GpuTexture> {
    let bit_depth = src.bit_depth()?;
    let size = src.size();
    let texels = match bit_depth {
        BitDepth::Eight => bgra8_from_rgba8(&src.image().to_rgba8()),
        BitDepth::SixteenFloat => encode_texels(&src.image().to_rgba32f(), bit_depth),
    };
    GpuTexture::upload(ctx, "lucent_image_texture", size, bit_depth, &texels).map_err(|e| {
        LucentError::conversion(ConversionStep::ImageToTexture, e.to_string())
    })
}

/// Read a texture back as a filterable image tagged with `color_space`.
pub fn filter_from_texture(
    ctx: &RenderContext,
    texture: &GpuTexture,
    color_space: ColorSpace,
) -> LucentResult<FilterImage> {
    let texels = texture
        .read_texels(ctx)
        .map_err(|e| LucentError::conversion(ConversionStep::TextureToFilter, e.to_string()))?;
    let pixels = decode_texels(texture.size(), texture.bit_depth(), &texels)?;
    Ok(FilterImage::new(pixels, color_space))
}

/// Render a filterable image into an encoded image of `bit_depth` in `color_space`.
pub fn image_from_filter(
    filter: &FilterImage,
    bit_depth: BitDepth,
    color_space: ColorSpace,
) -> LucentResult<SourceImage> {
    let size = filter.size();
    if size.is_empty() {
        return Err(LucentError::conversion(
            ConversionStep::FilterToImage,
            format!("empty filter image {size}"),
        ));
    }

    let converted;
    let filter = if filter.color_space() == color_space {
        filter
    } else {
        converted = filter.to_color_space(color_space);
        &converted
    };

    let raw = filter.pixels().as_raw();
    let image = match bit_depth {
        BitDepth::Eight => {
            let data: Vec<u8> = raw.iter().map(|&v| unorm8(v)).collect();
            image::RgbaImage::from_raw(size.width, size.height, data)
                .map(image::DynamicImage::ImageRgba8)
        }
        BitDepth::SixteenFloat => {
            let data: Vec<u16> = raw.iter().map(|&v| unorm16(v)).collect();
            image::ImageBuffer::<image::Rgba<u16>, _>::from_raw(size.width, size.height, data)
                .map(image::DynamicImage::ImageRgba16)
        }
    }
    .ok_or_else(|| {
        LucentError::conversion(
            ConversionStep::FilterToImage,
            format!("pixel buffer does not match {size}"),
        )
    })?;

    Ok(SourceImage::new(image, color_space))
}

/// Expand an encoded image, deriving its color space from the image.
pub fn filter_from_image(src: &SourceImage) -> LucentResult<FilterImage> {
    let color_space = src.color_space()?;
    FilterImage::from_source(src, color_space)
}

/// Upload a filterable image at `bit_depth`, re-encoding into `color_space`.
pub fn texture_from_filter(
    ctx: &RenderContext,
    filter: &FilterImage,
    bit_depth: BitDepth,
    color_space: ColorSpace,
) -> LucentResult<GpuTexture> {
    let filter = filter.to_color_space(color_space);
    let texels = encode_texels(filter.pixels(), bit_depth);
    GpuTexture::upload(ctx, "lucent_filter_texture", filter.size(), bit_depth, &texels)
        .map_err(|e| LucentError::conversion(ConversionStep::ImageToTexture, e.to_string()))
}

/// Read a texture back into an encoded image at the texture's bit depth.
pub fn image_from_texture(
    ctx: &RenderContext,
    texture: &GpuTexture,
    color_space: ColorSpace,
) -> LucentResult<SourceImage> {
    let filter = filter_from_texture(ctx, texture, color_space)
        .map_err(|e| LucentError::conversion(ConversionStep::TextureToImage, e.to_string()))?;
    image_from_filter(&filter, texture.bit_depth(), color_space)
}

/// Pack `f32` RGBA pixels into the GPU layout of `bit_depth`.
pub(crate) fn encode_texels(pixels: &image::Rgba32FImage, bit_depth: BitDepth) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(pixels.as_raw().len() / 4 * bit_depth.bytes_per_pixel() as usize);
    match bit_depth {
        BitDepth::Eight => {
            for px in pixels.pixels() {
                let [r, g, b, a] = px.0;
                out.extend_from_slice(&[unorm8(b), unorm8(g), unorm8(r), unorm8(a)]);
            }
        }
        BitDepth::SixteenFloat => {
            for &v in pixels.as_raw() {
                out.extend_from_slice(&half::f16::from_f32(v).to_le_bytes());
            }
        }
    }
    out
}

/// Unpack GPU texels of `bit_depth` into `f32` RGBA pixels.
pub(crate) fn decode_texels(
    size: PixelSize,
    bit_depth: BitDepth,
    texels: &[u8],
) -> LucentResult<image::Rgba32FImage> {
    let expected = size.pixel_count()? * bit_depth.bytes_per_pixel() as usize;
    if texels.len() != expected {
        return Err(LucentError::conversion(
            ConversionStep::TextureToFilter,
            format!("expected {expected} texel bytes, got {}", texels.len()),
        ));
    }

    let data: Vec<f32> = match bit_depth {
        BitDepth::Eight => texels
            .chunks_exact(4)
            .flat_map(|px| [px[2], px[1], px[0], px[3]])
            .map(|v| f32::from(v) / 255.0)
            .collect(),
        BitDepth::SixteenFloat => texels
            .chunks_exact(2)
            .map(|b| half::f16::from_le_bytes([b[0], b[1]]).to_f32())
            .collect(),
    };

    image::Rgba32FImage::from_raw(size.width, size.height, data).ok_or_else(|| {
        LucentError::conversion(
            ConversionStep::TextureToFilter,
            format!("texel buffer does not match {size}"),
        )
    })
}

fn bgra8_from_rgba8(rgba: &image::RgbaImage) -> Vec<u8> {
    rgba.as_raw()
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0], px[3]])
        .collect()
}

fn unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn unorm16(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * 65535.0).round() as u16
}

#[cfg(test)]
#[path = "../../tests/unit/convert/format.rs"]
mod tests;
