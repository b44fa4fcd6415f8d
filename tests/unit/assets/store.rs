use std::io::Cursor;

use super::*;
use crate::foundation::core::PixelSize;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "lucent_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

#[test]
fn resolves_exact_name_and_extension_fallback() {
    let dir = temp_dir("store_resolve");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("glass.png"), 3, 2);

    let assets = DirAssetSource::new(&dir);
    assert_eq!(assets.resolve("glass.png"), Some(dir.join("glass.png")));
    assert_eq!(assets.resolve("glass"), Some(dir.join("glass.png")));
    assert_eq!(assets.resolve("missing"), None);
    assert_eq!(assets.resolve(""), None);

    let img = assets.load("glass").unwrap().unwrap();
    assert_eq!(img.size(), PixelSize::new(3, 2));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_asset_is_none_not_error() {
    let assets = DirAssetSource::new(temp_dir("store_missing"));
    assert!(assets.load("nope").unwrap().is_none());
}

#[test]
fn corrupt_asset_is_an_error() {
    let dir = temp_dir("store_corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("bad.png"), b"garbage").unwrap();

    let assets = DirAssetSource::new(&dir);
    assert!(assets.load("bad").is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}
