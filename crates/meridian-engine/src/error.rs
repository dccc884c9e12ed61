use std::path::PathBuf;

use thiserror::Error;

/// Failures that make rendering impossible.
///
/// None of these are retried: the runtime stops the event loop and the binary
/// exits with [`StartupError::exit_code`].
#[derive(Error, Debug)]
pub enum StartupError {
    /// No adapter/device could be created, or the surface cannot be used.
    #[error("GPU device unavailable: {0}")]
    Device(String),

    /// The shader library file could not be read.
    #[error("failed to load shader library {}: {source}", path.display())]
    ShaderLibraryMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shader library was read but does not parse or validate.
    #[error("shader library {} is invalid:\n{message}", path.display())]
    ShaderLibraryInvalid { path: PathBuf, message: String },

    /// A program pair references an entry point the library does not export.
    #[error("shader library has no {stage} program named `{name}`")]
    MissingProgram { name: String, stage: &'static str },

    /// The driver rejected a pipeline, e.g. its shader interface does not
    /// match the vertex or bind group layouts.
    #[error("failed to create pipeline `{name}`: {message}")]
    PipelineCreation { name: String, message: String },

    /// A pipeline was requested by name but never built.
    #[error("no pipeline state named `{0}`")]
    MissingPipeline(String),

    /// The texture asset could not be decoded.
    #[error("failed to decode texture {}: {source}", path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl StartupError {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::ShaderLibraryMissing { .. }
            | StartupError::ShaderLibraryInvalid { .. } => -1,
            StartupError::MissingProgram { .. }
            | StartupError::PipelineCreation { .. }
            | StartupError::MissingPipeline(_) => -2,
            StartupError::Device(_) => -3,
            StartupError::Texture { .. } => -4,
        }
    }

    /// Resolves the exit code for an arbitrary runtime error.
    ///
    /// Errors that do not wrap a `StartupError` map to `1`.
    pub fn exit_code_of(err: &anyhow::Error) -> i32 {
        err.downcast_ref::<StartupError>()
            .map_or(1, StartupError::exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_and_pipeline_failures_have_distinct_codes() {
        let missing = StartupError::ShaderLibraryMissing {
            path: PathBuf::from("nope.wgsl"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let pipeline = StartupError::MissingPipeline("shaded".into());
        let rejected = StartupError::PipelineCreation {
            name: "shaded".into(),
            message: "location 5 is not provided".into(),
        };

        assert_eq!(missing.exit_code(), -1);
        assert_eq!(pipeline.exit_code(), -2);
        assert_eq!(rejected.exit_code(), -2);
        assert_ne!(missing.exit_code(), pipeline.exit_code());
    }

    #[test]
    fn exit_code_survives_anyhow_context() {
        let err = anyhow::Error::from(StartupError::Device("no adapter".into()))
            .context("failed to start engine");
        assert_eq!(StartupError::exit_code_of(&err), -3);

        let other = anyhow::anyhow!("window closed unexpectedly");
        assert_eq!(StartupError::exit_code_of(&other), 1);
    }
}
