pub mod input;
pub mod pixel;
