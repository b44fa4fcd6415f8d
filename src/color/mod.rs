//! Color-space and bit-depth model.

/// Channel precision and its GPU pixel format.
pub mod depth;
/// Color spaces, tone curves and explicit conversion.
pub mod space;
