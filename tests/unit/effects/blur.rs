use super::*;
use crate::color::space::ColorSpace;

fn checkerboard(w: u32, h: u32) -> FilterImage {
    let pixels = image::Rgba32FImage::from_fn(w, h, |x, y| {
        let v = if (x + y) % 2 == 0 { 1.0 } else { 0.0 };
        image::Rgba([v, v, v, 1.0])
    });
    FilterImage::new(pixels, ColorSpace::Linear)
}

fn solid_mask(w: u32, h: u32, v: f32) -> FilterImage {
    let pixels = image::Rgba32FImage::from_pixel(w, h, image::Rgba([v, v, v, 1.0]));
    FilterImage::new(pixels, ColorSpace::Linear)
}

fn variance(img: &FilterImage) -> f32 {
    let reds: Vec<f32> = img.pixels().pixels().map(|p| p.0[0]).collect();
    let mean = reds.iter().sum::<f32>() / reds.len() as f32;
    reds.iter().map(|r| (r - mean) * (r - mean)).sum::<f32>() / reds.len() as f32
}

#[test]
fn black_mask_is_identity() {
    let base = checkerboard(16, 12);
    let out = blur_with_mask(&base, &solid_mask(16, 12, 0.0)).unwrap();
    assert_eq!(out.pixels(), base.pixels());
}

#[test]
fn white_mask_smooths_high_frequencies() {
    let base = checkerboard(32, 32);
    let out = blur_with_mask(&base, &solid_mask(32, 32, 1.0)).unwrap();
    assert!(variance(&out) < variance(&base) * 0.05);
}

#[test]
fn small_mask_is_stretched_to_background_extent() {
    let base = checkerboard(40, 30);
    let out = blur_with_mask(&base, &solid_mask(4, 3, 0.5)).unwrap();
    assert_eq!(out.size(), PixelSize::new(40, 30));
    assert_eq!(out.color_space(), ColorSpace::Linear);
}

#[test]
fn blur_keeps_constant_images_constant() {
    let pixels = image::Rgba32FImage::from_pixel(9, 7, image::Rgba([0.2, 0.4, 0.6, 0.5]));
    let base = FilterImage::new(pixels, ColorSpace::Srgb);
    let out = VariableBlur::new(12.0)
        .unwrap()
        .apply(&base, &solid_mask(9, 7, 1.0))
        .unwrap();
    for px in out.pixels().pixels() {
        for (a, b) in px.0.iter().zip([0.2, 0.4, 0.6, 0.5]) {
            assert!((a - b).abs() < 1e-5);
        }
    }
}

#[test]
fn transparent_pixels_do_not_bleed_color() {
    let mut pixels = image::Rgba32FImage::from_pixel(5, 1, image::Rgba([0.0, 0.0, 0.0, 1.0]));
    pixels.put_pixel(0, 0, image::Rgba([1.0, 0.0, 0.0, 0.0]));
    let base = FilterImage::new(pixels, ColorSpace::Linear);
    let out = VariableBlur::new(6.0)
        .unwrap()
        .apply(&base, &solid_mask(5, 1, 1.0))
        .unwrap();
    assert!(out.pixels().pixels().all(|p| p.0[0] < 1e-6));
}

#[test]
fn invalid_radius_reports_construction_code() {
    for r in [-1.0, f32::NAN, f32::INFINITY] {
        let err = VariableBlur::new(r).unwrap_err();
        assert_eq!(err.blur_code(), Some(4));
    }
}

#[test]
fn mismatched_extents_report_output_code() {
    let err = VariableBlur::new(BLUR_MAX_RADIUS)
        .unwrap()
        .apply(&checkerboard(4, 4), &solid_mask(2, 2, 1.0))
        .unwrap_err();
    assert_eq!(err.blur_code(), Some(5));
}

#[test]
fn transpose_swaps_axes() {
    let src = [1, 2, 3, 4, 5, 6];
    assert_eq!(transpose(&src, 3, 2), vec![1, 4, 2, 5, 3, 6]);
}
