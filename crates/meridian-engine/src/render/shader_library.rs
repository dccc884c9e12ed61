use std::path::{Path, PathBuf};

use crate::error::StartupError;

/// Pipeline stage a program runs in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProgramStage {
    Vertex,
    Fragment,
}

impl ProgramStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            ProgramStage::Vertex => naga::ShaderStage::Vertex,
            ProgramStage::Fragment => naga::ShaderStage::Fragment,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProgramStage::Vertex => "vertex",
            ProgramStage::Fragment => "fragment",
        }
    }
}

/// Validated WGSL source exposing named vertex/fragment programs.
///
/// Parsing and validation happen on the CPU at load time, so a broken library
/// is reported before any pipeline is built.
pub struct ShaderLibrary {
    path: PathBuf,
    source: String,
    entry_points: Vec<(String, naga::ShaderStage)>,
}

impl ShaderLibrary {
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        let source =
            std::fs::read_to_string(path).map_err(|source| StartupError::ShaderLibraryMissing {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_source(path, source)
    }

    /// Parses and validates `source`; `path` is only used in diagnostics.
    pub fn from_source(path: &Path, source: String) -> Result<Self, StartupError> {
        let invalid = |message: String| StartupError::ShaderLibraryInvalid {
            path: path.to_path_buf(),
            message,
        };

        let module = naga::front::wgsl::parse_str(&source)
            .map_err(|e| invalid(e.emit_to_string(&source)))?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .map_err(|e| invalid(e.emit_to_string(&source)))?;

        let entry_points: Vec<_> = module
            .entry_points
            .iter()
            .map(|ep| (ep.name.clone(), ep.stage))
            .collect();

        log::info!(
            "loaded shader library {} ({} entry points)",
            path.display(),
            entry_points.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            source,
            entry_points,
        })
    }

    pub fn has_program(&self, name: &str, stage: ProgramStage) -> bool {
        let stage = stage.naga();
        self.entry_points
            .iter()
            .any(|(n, s)| n == name && *s == stage)
    }

    /// Looks up a program by name, failing with [`StartupError::MissingProgram`].
    pub fn program<'n>(&self, name: &'n str, stage: ProgramStage) -> Result<&'n str, StartupError> {
        if self.has_program(name, stage) {
            Ok(name)
        } else {
            Err(StartupError::MissingProgram {
                name: name.to_owned(),
                stage: stage.label(),
            })
        }
    }

    /// Creates the GPU shader module for this library.
    ///
    /// Runs inside a validation error scope, so a module the driver rejects
    /// is reported as [`StartupError::ShaderLibraryInvalid`].
    pub fn compile(&self, device: &wgpu::Device) -> Result<wgpu::ShaderModule, StartupError> {
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("meridian shader library"),
            source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
        });

        match pollster::block_on(scope.pop()) {
            None => Ok(module),
            Some(err) => Err(StartupError::ShaderLibraryInvalid {
                path: self.path.clone(),
                message: err.to_string(),
            }),
        }
    }
}
