//! Lucent layers a foreground image with alpha over a background on the GPU.
//!
//! An overlay is described by an [`InputImage`]: a required foreground plus an
//! optional displacement map (whose `rg` channels pick the background sampling
//! coordinate per pixel) and an optional blur mask (whose luminance drives a
//! per-pixel background blur of up to [`BLUR_MAX_RADIUS`] pixels).
//!
//! - Create a [`RenderContext`] once and pass it to every call
//! - Build an [`InputImage`] from images, textures or named assets
//! - Call [`try_render_overlay`] / [`try_render_overlay_texture`], or the
//!   aborting [`render_overlay`] / [`render_overlay_texture`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod buffer;
pub mod color;
pub mod convert;
mod effects;
mod foundation;
mod gpu;
mod overlay;
mod render;

pub use crate::assets::source::SourceImage;
pub use crate::assets::store::{AssetSource, DirAssetSource};
pub use crate::buffer::input::InputImage;
pub use crate::buffer::pixel::{PixelBuffer, PixelSource};
pub use crate::color::depth::BitDepth;
pub use crate::color::space::{ColorSpace, Transfer};
pub use crate::convert::filter::FilterImage;
pub use crate::effects::blur::{BLUR_MAX_RADIUS, VariableBlur, blur_background, blur_with_mask};
pub use crate::foundation::core::PixelSize;
pub use crate::foundation::error::{
    BlurStep, ConversionStep, GpuResource, LucentError, LucentResult,
};
pub use crate::foundation::settings::{
    BlurMode, ContextOptions, DEFAULT_FRAGMENT_STAGE, LucentConfig, PowerPreference,
    RenderSettings,
};
pub use crate::gpu::context::RenderContext;
pub use crate::gpu::shader::{
    ShaderCatalog, ShaderLibrary, StageKind, TRANSPARENCY_WGSL, VERTEX_QUAD_STAGE,
};
pub use crate::gpu::texture::GpuTexture;
pub use crate::overlay::{
    render_overlay, render_overlay_texture, try_render_overlay, try_render_overlay_texture,
};
pub use crate::render::composite::{ALPHA_EPSILON, Rgba, composite, over};
