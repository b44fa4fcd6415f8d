use super::*;

#[test]
fn eight_bit_texels_are_bgra_and_rounded() {
    let pixels = image::Rgba32FImage::from_pixel(1, 1, image::Rgba([1.0, 0.5, 0.0, 2.0]));
    let texels = encode_texels(&pixels, BitDepth::Eight);
    assert_eq!(texels, vec![0, 128, 255, 255]);
}

#[test]
fn sixteen_bit_texels_are_little_endian_halves() {
    let pixels = image::Rgba32FImage::from_pixel(2, 1, image::Rgba([0.25, 0.5, 0.75, 1.0]));
    let texels = encode_texels(&pixels, BitDepth::SixteenFloat);
    assert_eq!(texels.len(), 16);
    assert_eq!(&texels[..2], &half::f16::from_f32(0.25).to_le_bytes());

    let back = decode_texels(PixelSize::new(2, 1), BitDepth::SixteenFloat, &texels).unwrap();
    assert_eq!(back.get_pixel(1, 0).0, [0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn decode_swizzles_bgra_back() {
    let back = decode_texels(PixelSize::new(1, 1), BitDepth::Eight, &[0, 0, 255, 255]).unwrap();
    assert_eq!(back.get_pixel(0, 0).0, [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn decode_rejects_short_buffers() {
    let err = decode_texels(PixelSize::new(2, 2), BitDepth::Eight, &[0; 12]).unwrap_err();
    assert!(matches!(
        err,
        LucentError::Conversion {
            step: ConversionStep::TextureToFilter,
            ..
        }
    ));
}

#[test]
fn image_from_filter_writes_requested_depth_and_space() {
    let pixels = image::Rgba32FImage::from_pixel(3, 2, image::Rgba([0.5, 0.0, 1.0, 1.0]));
    let filter = FilterImage::new(pixels, ColorSpace::Linear);

    let eight = image_from_filter(&filter, BitDepth::Eight, ColorSpace::Linear).unwrap();
    assert_eq!(eight.size(), PixelSize::new(3, 2));
    assert_eq!(eight.bits_per_component(), 8);
    assert_eq!(eight.color_space().unwrap(), ColorSpace::Linear);
    assert_eq!(eight.image().to_rgba8().get_pixel(0, 0).0, [128, 0, 255, 255]);

    let sixteen = image_from_filter(&filter, BitDepth::SixteenFloat, ColorSpace::Srgb).unwrap();
    assert_eq!(sixteen.bits_per_component(), 16);
    assert_eq!(sixteen.color_space().unwrap(), ColorSpace::Srgb);
    let r = sixteen.image().to_rgba16().get_pixel(0, 0).0[0];
    // linear 0.5 encodes to ~0.7354
    assert!((f32::from(r) / 65535.0 - 0.7354).abs() < 1e-3);
}

#[test]
fn filter_from_image_uses_tagged_space() {
    let src = SourceImage::new(
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(2, 2)),
        ColorSpace::Linear,
    );
    let f = filter_from_image(&src).unwrap();
    assert_eq!(f.color_space(), ColorSpace::Linear);
    assert_eq!(f.size(), PixelSize::new(2, 2));

    let unknown = SourceImage::with_color_space_id(src.into_image(), "rec2020");
    assert!(matches!(
        filter_from_image(&unknown).unwrap_err(),
        LucentError::FormatUnsupported(_)
    ));
}
