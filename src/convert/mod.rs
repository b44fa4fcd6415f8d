//! Format conversion layer between images, filterable images and textures.

/// Filterable `f32` image.
pub mod filter;
/// Representation changes.
pub mod format;
