use std::collections::HashMap;

use super::*;

fn rgba8(w: u32, h: u32, space: ColorSpace) -> SourceImage {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 100, 50, 128]));
    SourceImage::new(image::DynamicImage::ImageRgba8(img), space)
}

struct MemoryAssets(HashMap<&'static str, SourceImage>);

impl AssetSource for MemoryAssets {
    fn load(&self, name: &str) -> LucentResult<Option<SourceImage>> {
        Ok(self.0.get(name).cloned())
    }
}

#[test]
fn metadata_comes_from_foreground() {
    let input = InputImage::from_images(
        rgba8(8, 6, ColorSpace::Linear),
        Some(rgba8(8, 6, ColorSpace::Srgb)),
        None,
    )
    .unwrap();
    assert_eq!(input.size(), PixelSize::new(8, 6));
    assert_eq!(input.color_space(), ColorSpace::Linear);
    assert_eq!(input.bit_depth(), BitDepth::Eight);
    assert!(input.map().is_some());
    assert!(input.blur().is_none());
}

#[test]
fn mismatched_map_size_is_accepted() {
    let input = InputImage::from_images(
        rgba8(100, 100, ColorSpace::Srgb),
        Some(rgba8(10, 40, ColorSpace::Srgb)),
        Some(rgba8(3, 3, ColorSpace::Srgb)),
    )
    .unwrap();
    assert_eq!(input.size(), PixelSize::new(100, 100));
    assert_eq!(input.map().unwrap().size(), PixelSize::new(10, 40));
}

#[test]
fn builder_attaches_optional_buffers() {
    let fg = PixelBuffer::from_image(rgba8(2, 2, ColorSpace::Srgb)).unwrap();
    let mask = PixelBuffer::from_image(rgba8(2, 2, ColorSpace::Srgb)).unwrap();
    let input = InputImage::new(fg).with_blur(mask);
    assert!(input.map().is_none());
    assert!(input.blur().is_some());
}

#[test]
fn named_assets_resolve_through_source() {
    let assets = MemoryAssets(HashMap::from([
        ("glass", rgba8(4, 4, ColorSpace::Srgb)),
        ("ripple", rgba8(4, 4, ColorSpace::Linear)),
    ]));
    let input = InputImage::try_named(&assets, "glass", Some("ripple"), None).unwrap();
    assert_eq!(input.size(), PixelSize::new(4, 4));
    assert_eq!(input.map().unwrap().color_space(), ColorSpace::Linear);
}

#[test]
fn missing_named_asset_is_reported_by_name() {
    let assets = MemoryAssets(HashMap::from([("glass", rgba8(4, 4, ColorSpace::Srgb))]));
    let err = InputImage::try_named(&assets, "glass", None, Some("frost")).unwrap_err();
    match err {
        LucentError::AssetNotFound(name) => assert_eq!(name, "frost"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn named_background_lookup_reports_missing_name() {
    let assets = MemoryAssets(HashMap::from([("glass", rgba8(4, 4, ColorSpace::Srgb))]));
    assert!(load_named(&assets, "glass").is_ok());
    match load_named(&assets, "backdrop").unwrap_err() {
        LucentError::AssetNotFound(name) => assert_eq!(name, "backdrop"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn layer_over_missing_named_background_fails() {
    let ctx = match RenderContext::new(&crate::ContextOptions::default()) {
        Ok(ctx) => ctx,
        Err(LucentError::DeviceUnavailable(msg)) => {
            eprintln!("skipping: {msg}");
            return;
        }
        Err(e) => panic!("context creation failed: {e}"),
    };
    let assets = MemoryAssets(HashMap::from([("glass", rgba8(4, 4, ColorSpace::Srgb))]));
    let mut input = InputImage::try_named(&assets, "glass", None, None).unwrap();
    let err = input
        .try_layer_over_named(&ctx, &assets, "backdrop")
        .unwrap_err();
    assert!(matches!(err, LucentError::AssetNotFound(ref name) if name == "backdrop"));

    let assets = MemoryAssets(HashMap::from([
        ("glass", rgba8(4, 4, ColorSpace::Srgb)),
        ("backdrop", rgba8(6, 5, ColorSpace::Srgb)),
    ]));
    let out = input.try_layer_over_named(&ctx, &assets, "backdrop").unwrap();
    assert_eq!(out.size(), PixelSize::new(6, 5));
}
