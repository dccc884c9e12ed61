//! Color values shared by the engine configuration and the GPU uniforms.

pub mod color;

pub use color::Color;
