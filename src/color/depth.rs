use std::fmt;

use crate::foundation::error::{LucentError, LucentResult};

/// Per-channel precision of a pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitDepth {
    /// 8-bit unsigned normalized channels.
    Eight,
    /// 16-bit half-float channels.
    SixteenFloat,
}

impl BitDepth {
    /// Every supported bit depth.
    pub const ALL: [BitDepth; 2] = [Self::Eight, Self::SixteenFloat];

    /// GPU texture format storing this precision.
    pub fn pixel_format(self) -> wgpu::TextureFormat {
        match self {
            Self::Eight => wgpu::TextureFormat::Bgra8Unorm,
            Self::SixteenFloat => wgpu::TextureFormat::Rgba16Float,
        }
    }

    /// Reverse of [`BitDepth::pixel_format`].
    pub fn from_pixel_format(format: wgpu::TextureFormat) -> LucentResult<Self> {
        let mut matches = Self::ALL.into_iter().filter(|b| b.pixel_format() == format);
        match (matches.next(), matches.next()) {
            (Some(bits), None) => Ok(bits),
            _ => Err(LucentError::unsupported(format!(
                "texture format {format:?}"
            ))),
        }
    }

    /// Precision of a source image with `bits` per color component.
    pub fn from_bits_per_component(bits: u32) -> LucentResult<Self> {
        match bits {
            8 => Ok(Self::Eight),
            16 => Ok(Self::SixteenFloat),
            other => Err(LucentError::unsupported(format!(
                "bit depth {other} bits per component"
            ))),
        }
    }

    /// Bits per component in the encoded image representation.
    pub fn bits_per_component(self) -> u32 {
        match self {
            Self::Eight => 8,
            Self::SixteenFloat => 16,
        }
    }

    /// Bytes per texel in the GPU representation.
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Eight => 4,
            Self::SixteenFloat => 8,
        }
    }

    /// Render-target usages; the float path is also shader-writable.
    pub(crate) fn render_target_usage(self) -> wgpu::TextureUsages {
        let base = wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC;
        match self {
            Self::Eight => base,
            Self::SixteenFloat => base | wgpu::TextureUsages::STORAGE_BINDING,
        }
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eight => f.write_str("8-bit"),
            Self::SixteenFloat => f.write_str("16-bit float"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/depth.rs"]
mod tests;
