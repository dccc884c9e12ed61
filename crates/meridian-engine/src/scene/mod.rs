//! Scene description: meshes, per-object transform rules, camera.

pub mod camera;
pub mod geometry;
pub mod object;

pub use camera::Camera;
pub use geometry::{GeometryFactory, Shape, Vertex};
pub use object::{Scene, SceneObject, SceneVariant, TransformRule, LIGHT_PIPELINE, SHADED_PIPELINE};
