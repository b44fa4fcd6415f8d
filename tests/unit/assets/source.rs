use std::io::Cursor;

use super::*;
use crate::foundation::error::LucentError;

fn png_bytes(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_is_srgb_with_dimensions() {
    let img = image::RgbaImage::from_raw(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 128]).unwrap();
    let src = SourceImage::decode(&png_bytes(image::DynamicImage::ImageRgba8(img))).unwrap();
    assert_eq!(src.size(), PixelSize::new(2, 1));
    assert_eq!(src.color_space().unwrap(), ColorSpace::Srgb);
    assert_eq!(src.bit_depth().unwrap(), BitDepth::Eight);
}

#[test]
fn sixteen_bit_png_keeps_precision() {
    let img = image::ImageBuffer::<image::Rgba<u16>, _>::from_raw(1, 1, vec![1u16, 2, 3, 4])
        .unwrap();
    let src = SourceImage::decode(&png_bytes(image::DynamicImage::ImageRgba16(img))).unwrap();
    assert_eq!(src.bits_per_component(), 16);
    assert_eq!(src.bit_depth().unwrap(), BitDepth::SixteenFloat);
}

#[test]
fn float_images_have_unsupported_bit_depth() {
    let img = image::Rgba32FImage::new(1, 1);
    let src = SourceImage::new(image::DynamicImage::ImageRgba32F(img), ColorSpace::Linear);
    assert_eq!(src.bits_per_component(), 32);
    assert!(matches!(
        src.bit_depth().unwrap_err(),
        LucentError::FormatUnsupported(_)
    ));
}

#[test]
fn unknown_color_space_id_fails_on_resolve() {
    let src = SourceImage::with_color_space_id(
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(1, 1)),
        "adobe-rgb",
    );
    assert_eq!(src.color_space_id(), "adobe-rgb");
    assert!(matches!(
        src.color_space().unwrap_err(),
        LucentError::FormatUnsupported(_)
    ));
}

#[test]
fn decode_garbage_fails() {
    assert!(SourceImage::decode(b"not an image").is_err());
}

fn utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

#[test]
fn icc_description_selects_color_space() {
    let mut p3 = b"\0\0\x02\x1cappl\x04\0\0\0mntrRGB XYZ mluc".to_vec();
    p3.extend(utf16be("Display P3"));
    assert_eq!(color_space_from_icc(&p3), ColorSpace::DisplayP3);

    let linear = b"desc\0\0\0\0\0\0\0\x11Linear sRGB\0".to_vec();
    assert_eq!(color_space_from_icc(&linear), ColorSpace::Linear);

    let srgb = b"desc\0\0\0\0\0\0\0\x12sRGB IEC61966-2.1\0".to_vec();
    assert_eq!(color_space_from_icc(&srgb), ColorSpace::Srgb);
    assert_eq!(color_space_from_icc(&[]), ColorSpace::Srgb);
}
