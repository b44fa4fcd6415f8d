use std::fmt;

use crate::foundation::error::{LucentError, LucentResult};

/// Pixel dimensions of an image or texture.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Build a size from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total pixel count, failing on `usize` overflow.
    pub fn pixel_count(self) -> LucentResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or_else(|| LucentError::validation(format!("pixel count overflow for {self}")))
    }

    /// Fail unless both dimensions are non-zero.
    pub fn ensure_non_empty(self) -> LucentResult<Self> {
        if self.is_empty() {
            return Err(LucentError::validation(format!(
                "image size must be non-zero, got {self}"
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for PixelSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}
