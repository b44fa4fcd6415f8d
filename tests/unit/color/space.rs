use super::*;

#[test]
fn resolve_matches_ids_exactly() {
    for space in ColorSpace::ALL {
        assert_eq!(ColorSpace::resolve(space.id()).unwrap(), space);
    }
    assert!(matches!(
        ColorSpace::resolve("SRGB").unwrap_err(),
        LucentError::FormatUnsupported(_)
    ));
}

#[test]
fn transfer_pairs() {
    use ColorSpace::*;
    assert_eq!(Linear.transfer_to(Srgb), Transfer::Encode);
    assert_eq!(Srgb.transfer_to(Linear), Transfer::Decode);
    assert_eq!(Srgb.transfer_to(Srgb), Transfer::Identity);
    assert_eq!(DisplayP3.transfer_to(Linear), Transfer::Unsupported);
    assert!(Transfer::Unsupported.is_noop());
}

#[test]
fn srgb_curve_known_values() {
    assert_eq!(srgb_encode(0.0), 0.0);
    assert!((srgb_encode(1.0) - 1.0).abs() < 1e-6);
    assert!((srgb_encode(0.5) - 0.735_357).abs() < 1e-4);
    assert!((srgb_decode(0.5) - 0.214_041).abs() < 1e-4);
    assert!((srgb_decode(srgb_encode(0.02)) - 0.02).abs() < 1e-6);
}

fn ramp() -> SourceImage {
    let data: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v, 255]).collect();
    let img = image::RgbaImage::from_raw(256, 1, data).unwrap();
    SourceImage::new(image::DynamicImage::ImageRgba8(img), ColorSpace::Linear)
}

#[test]
fn identity_conversion_keeps_pixels() {
    let src = ramp();
    let out = convert(ColorSpace::Linear, ColorSpace::Linear, &src, BitDepth::Eight).unwrap();
    let img = out.cached_image().unwrap();
    assert_eq!(img.image().to_rgba8(), src.image().to_rgba8());
    assert_eq!(out.color_space(), ColorSpace::Linear);
}

#[test]
fn eight_bit_round_trip_within_one_step() {
    let src = ramp();
    let srgb = convert(ColorSpace::Linear, ColorSpace::Srgb, &src, BitDepth::Eight).unwrap();
    assert_eq!(srgb.color_space(), ColorSpace::Srgb);
    let back = convert(
        ColorSpace::Srgb,
        ColorSpace::Linear,
        srgb.cached_image().unwrap(),
        BitDepth::Eight,
    )
    .unwrap();

    let a = src.image().to_rgba8();
    let b = back.cached_image().unwrap().image().to_rgba8();
    for (x, y) in a.as_raw().iter().zip(b.as_raw()) {
        assert!(x.abs_diff(*y) <= 1, "{x} vs {y}");
    }
}

#[test]
fn convert_leaves_input_untouched() {
    let src = ramp();
    let before = src.image().to_rgba8();
    let _ = convert(ColorSpace::Linear, ColorSpace::Srgb, &src, BitDepth::Eight).unwrap();
    assert_eq!(src.image().to_rgba8(), before);
    assert_eq!(src.color_space().unwrap(), ColorSpace::Linear);
}

#[test]
fn display_p3_passes_through() {
    let src = ramp();
    let out = convert(ColorSpace::DisplayP3, ColorSpace::Linear, &src, BitDepth::Eight).unwrap();
    assert_eq!(out.cached_image().unwrap().image().to_rgba8(), src.image().to_rgba8());
}
