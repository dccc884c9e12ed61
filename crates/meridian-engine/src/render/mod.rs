//! GPU rendering subsystem.
//!
//! [`FrameEngine`] owns every render resource and encodes one frame per call.
//! Pipelines and geometry are built once; only the attachments change, and
//! only on resize.

pub mod attachments;
pub mod engine;
pub mod pass;
pub mod pipelines;
pub mod shader_library;
pub mod uniforms;

pub use attachments::{AttachmentSet, AttachmentSpec};
pub use engine::{FrameEngine, FrameOutcome, FramePacing, FrameStats};
pub use pass::PassTemplate;
pub use pipelines::{DepthCompareState, PipelineCatalog, PipelineState, ProgramPair};
pub use shader_library::{ProgramStage, ShaderLibrary};
pub use uniforms::{FrameFences, LightingUniform, TransformUniform, UniformRing};
