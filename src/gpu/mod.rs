pub mod context;
pub mod shader;
pub mod texture;
