use std::time::Instant;

use rayon::prelude::*;

use crate::{
    assets::source::SourceImage,
    buffer::pixel::PixelBuffer,
    color::depth::BitDepth,
    convert::{filter::FilterImage, format},
    foundation::{
        core::PixelSize,
        error::{BlurStep, LucentError, LucentResult},
    },
    gpu::context::RenderContext,
};

/// Blur reach, in background pixels, of a fully white mask pixel.
pub const BLUR_MAX_RADIUS: f32 = 100.0;

const BOX_PASSES: usize = 3;

type Px = [f32; 4];

/// Mask-driven variable blur.
///
/// Each output pixel is blurred with a reach of `luminance(mask) * max_radius`
/// pixels. Three separable box passes with a per-pixel half-width of a third
/// of that reach approximate a Gaussian. Pixels with zero reach are returned
/// untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariableBlur {
    max_radius: f32,
}

impl VariableBlur {
    /// Filter with the given full-luminance reach.
    pub fn new(max_radius: f32) -> LucentResult<Self> {
        if !max_radius.is_finite() || max_radius < 0.0 {
            return Err(LucentError::blur(
                BlurStep::FilterConstruction,
                format!("max radius must be finite and >= 0, got {max_radius}"),
            ));
        }
        Ok(Self { max_radius })
    }

    /// Reach of a fully white mask pixel.
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Blur `base` with per-pixel reach taken from `mask` of the same size.
    pub fn apply(&self, base: &FilterImage, mask: &FilterImage) -> LucentResult<FilterImage> {
        let size = base.size();
        if size.is_empty() || mask.size() != size {
            return Err(LucentError::blur(
                BlurStep::FilterOutput,
                format!("base {size} and mask {} must match and be non-empty", mask.size()),
            ));
        }
        let width = size.width as usize;
        let height = size.height as usize;

        let reach: Vec<u32> = mask
            .pixels()
            .as_raw()
            .par_chunks_exact(4)
            .map(|px| self.half_width(px))
            .collect();
        if reach.iter().all(|&k| k == 0) {
            return Ok(base.clone());
        }
        let reach_t = transpose(&reach, width, height);

        let mut work: Vec<Px> = base
            .pixels()
            .as_raw()
            .chunks_exact(4)
            .map(|px| [px[0] * px[3], px[1] * px[3], px[2] * px[3], px[3]])
            .collect();

        let mut tmp = vec![[0.0; 4]; work.len()];
        for _ in 0..BOX_PASSES {
            horizontal_pass(&work, &mut tmp, width, &reach);
            let cols = transpose(&tmp, width, height);
            let mut cols_out = vec![[0.0; 4]; cols.len()];
            horizontal_pass(&cols, &mut cols_out, height, &reach_t);
            work = transpose(&cols_out, height, width);
        }

        let original = base.pixels().as_raw();
        let data: Vec<f32> = work
            .par_iter()
            .zip(reach.par_iter())
            .enumerate()
            .flat_map_iter(|(i, (px, &k))| {
                if k == 0 {
                    let o = &original[i * 4..i * 4 + 4];
                    [o[0], o[1], o[2], o[3]]
                } else {
                    unpremultiply(*px)
                }
            })
            .collect();

        let pixels = image::Rgba32FImage::from_raw(size.width, size.height, data).ok_or_else(
            || LucentError::blur(BlurStep::FilterOutput, "output buffer does not match extent"),
        )?;
        Ok(FilterImage::new(pixels, base.color_space()))
    }

    fn half_width(&self, mask_px: &[f32]) -> u32 {
        let lum = (0.2126 * mask_px[0] + 0.7152 * mask_px[1] + 0.0722 * mask_px[2]).clamp(0.0, 1.0);
        (lum * self.max_radius / BOX_PASSES as f32).round() as u32
    }
}

/// Blur `base` with `mask`, stretching the mask to the base extent first.
///
/// The result always has the extent of `base`.
pub fn blur_with_mask(base: &FilterImage, mask: &FilterImage) -> LucentResult<FilterImage> {
    let size = base.size();
    let restretched;
    let mask = if mask.size() == size {
        mask
    } else {
        tracing::debug!(mask = %mask.size(), background = %size, "resizing blur mask");
        restretched = restretch(mask, size)?;
        &restretched
    };

    let filter = VariableBlur::new(BLUR_MAX_RADIUS)?;
    Ok(filter.apply(base, mask)?.cropped(size))
}

/// Run the variable blur over `background`, driven by `mask`.
///
/// The returned buffer is texture-backed at the background's color space and
/// bit depth. Failures carry the [`BlurStep`] that produced them.
#[tracing::instrument(skip_all, fields(background = %background.size(), mask = %mask.size()))]
pub fn blur_background(
    ctx: &RenderContext,
    background: &PixelBuffer,
    mask: &PixelBuffer,
) -> LucentResult<PixelBuffer> {
    let t0 = Instant::now();
    let base = background
        .filter_image(ctx)
        .map_err(|e| LucentError::blur(BlurStep::Background, e.to_string()))?;
    let mask = mask
        .filter_image(ctx)
        .map_err(|e| LucentError::blur(BlurStep::Mask, e.to_string()))?;

    let out = blur_with_mask(&base, &mask)?;
    let texture = format::texture_from_filter(
        ctx,
        &out,
        background.bit_depth(),
        background.color_space(),
    )
    .map_err(|e| LucentError::blur(BlurStep::FilterOutput, e.to_string()))?;

    tracing::debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "background blurred");
    Ok(PixelBuffer::from_texture(texture, background.color_space()))
}

fn restretch(mask: &FilterImage, size: PixelSize) -> LucentResult<FilterImage> {
    let space = mask.color_space();
    let image = format::image_from_filter(mask, BitDepth::SixteenFloat, space)
        .map_err(|e| LucentError::blur(BlurStep::MaskConversion, e.to_string()))?;
    let resized = image.image().resize_exact(
        size.width,
        size.height,
        image::imageops::FilterType::Triangle,
    );
    FilterImage::from_source(&SourceImage::new(resized, space), space)
        .map_err(|e| LucentError::blur(BlurStep::MaskRestretch, e.to_string()))
}

fn horizontal_pass(src: &[Px], dst: &mut [Px], width: usize, reach: &[u32]) {
    dst.par_chunks_mut(width)
        .zip(src.par_chunks(width))
        .zip(reach.par_chunks(width))
        .for_each(|((out, row), k)| box_row(row, out, k));
}

// Edge pixels are replicated outside the row.
fn box_row(row: &[Px], out: &mut [Px], reach: &[u32]) {
    let w = row.len();
    let mut prefix = vec![[0.0f64; 4]; w + 1];
    for (x, px) in row.iter().enumerate() {
        for c in 0..4 {
            prefix[x + 1][c] = prefix[x][c] + f64::from(px[c]);
        }
    }

    let first = row[0];
    let last = row[w - 1];
    for x in 0..w {
        let k = reach[x] as usize;
        if k == 0 {
            out[x] = row[x];
            continue;
        }
        let lo = x.saturating_sub(k);
        let hi = (x + k).min(w - 1);
        let left_extra = (k - (x - lo)) as f64;
        let right_extra = (k - (hi - x)) as f64;
        let n = (2 * k + 1) as f64;
        for c in 0..4 {
            let inner = prefix[hi + 1][c] - prefix[lo][c];
            let sum = inner + left_extra * f64::from(first[c]) + right_extra * f64::from(last[c]);
            out[x][c] = (sum / n) as f32;
        }
    }
}

fn transpose<T: Copy + Send + Sync>(src: &[T], width: usize, height: usize) -> Vec<T> {
    (0..width * height)
        .into_par_iter()
        .map(|i| {
            let (x, y) = (i / height, i % height);
            src[y * width + x]
        })
        .collect()
}

fn unpremultiply(px: Px) -> Px {
    let a = px[3];
    if a <= f32::EPSILON {
        return [0.0; 4];
    }
    [px[0] / a, px[1] / a, px[2] / a, a]
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
