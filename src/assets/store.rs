use std::path::{Path, PathBuf};

use crate::{assets::source::SourceImage, foundation::error::LucentResult};

/// Extensions tried, in order, when a name has no file of its own.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "tiff"];

/// Lookup of named image assets.
pub trait AssetSource {
    /// Decode the asset called `name`, or `Ok(None)` when it does not exist.
    ///
    /// Errors are reserved for assets that exist but fail to load.
    fn load(&self, name: &str) -> LucentResult<Option<SourceImage>>;
}

/// Resolves asset names against files in a directory.
#[derive(Clone, Debug)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    /// Serve assets from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory assets are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `name`: the exact name first, then `name.<ext>`.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let exact = self.root.join(name);
        if exact.is_file() {
            return Some(exact);
        }
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{name}.{ext}")))
            .find(|p| p.is_file())
    }
}

impl AssetSource for DirAssetSource {
    fn load(&self, name: &str) -> LucentResult<Option<SourceImage>> {
        match self.resolve(name) {
            Some(path) => {
                tracing::debug!(name, path = %path.display(), "loading named asset");
                SourceImage::open(&path).map(Some)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
