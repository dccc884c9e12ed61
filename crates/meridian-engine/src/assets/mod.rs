//! GPU-resident assets created once at startup.

pub mod mesh;
pub mod texture;

pub use mesh::GeometryBuffer;
pub use texture::{DecodedImage, TextureAsset};
