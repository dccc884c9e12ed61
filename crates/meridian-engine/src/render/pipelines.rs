use std::collections::HashMap;

use crate::error::StartupError;
use crate::scene::{Vertex, LIGHT_PIPELINE, SHADED_PIPELINE};

use super::attachments::AttachmentSpec;
use super::shader_library::{ProgramStage, ShaderLibrary};
use super::uniforms::{LightingUniform, TransformUniform, UniformRing};

/// Depth test shared by every pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DepthCompareState {
    pub compare: wgpu::CompareFunction,
    pub write_enabled: bool,
}

impl Default for DepthCompareState {
    fn default() -> Self {
        Self {
            compare: wgpu::CompareFunction::LessEqual,
            write_enabled: true,
        }
    }
}

impl DepthCompareState {
    fn to_wgpu(self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.write_enabled,
            depth_compare: self.compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// A named vertex/fragment program pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProgramPair {
    pub name: &'static str,
    pub vertex: &'static str,
    pub fragment: &'static str,
    /// Binds the material texture at group 2.
    pub uses_material: bool,
}

impl ProgramPair {
    pub const SHADED: ProgramPair = ProgramPair {
        name: SHADED_PIPELINE,
        vertex: "sphere_vs",
        fragment: "sphere_fs",
        uses_material: true,
    };

    pub const LIGHT: ProgramPair = ProgramPair {
        name: LIGHT_PIPELINE,
        vertex: "light_vs",
        fragment: "light_fs",
        uses_material: false,
    };

    pub fn defaults() -> [ProgramPair; 2] {
        [Self::SHADED, Self::LIGHT]
    }
}

/// Bind group layouts every program is built against.
pub struct BindLayouts {
    /// group(0): [`TransformUniform`], vertex stage.
    pub transforms: wgpu::BindGroupLayout,
    /// group(1): [`LightingUniform`], fragment stage.
    pub lighting: wgpu::BindGroupLayout,
    /// group(2): texture + sampler, fragment stage.
    pub material: wgpu::BindGroupLayout,
}

impl BindLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let transforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("meridian transforms bgl"),
            entries: &[UniformRing::<TransformUniform>::layout_entry(
                wgpu::ShaderStages::VERTEX,
            )],
        });

        let lighting = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("meridian lighting bgl"),
            entries: &[UniformRing::<LightingUniform>::layout_entry(
                wgpu::ShaderStages::FRAGMENT,
            )],
        });

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("meridian material bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            transforms,
            lighting,
            material,
        }
    }
}

/// A compiled pipeline and the configuration it was built for.
pub struct PipelineState {
    pub name: &'static str,
    pub sample_count: u32,
    pub uses_material: bool,
    pub pipeline: wgpu::RenderPipeline,
}

/// Pipelines by name plus the one shared depth state. Built once at startup.
pub struct PipelineCatalog {
    layouts: BindLayouts,
    pipelines: HashMap<&'static str, PipelineState>,
    depth_state: DepthCompareState,
}

impl PipelineCatalog {
    /// Builds one pipeline per program pair.
    ///
    /// Every entry point is checked against the library first, so a missing
    /// program fails with [`StartupError::MissingProgram`]. Pipelines the
    /// driver rejects fail with [`StartupError::PipelineCreation`].
    pub fn build(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        programs: &[ProgramPair],
        spec: AttachmentSpec,
    ) -> Result<Self, StartupError> {
        for pair in programs {
            library.program(pair.vertex, ProgramStage::Vertex)?;
            library.program(pair.fragment, ProgramStage::Fragment)?;
        }

        let layouts = BindLayouts::new(device);
        let depth_state = DepthCompareState::default();
        let module = library.compile(device)?;

        let pipelines = programs
            .iter()
            .map(|pair| {
                let state =
                    Self::build_pipeline(device, &module, &layouts, *pair, spec, depth_state)?;
                Ok((pair.name, state))
            })
            .collect::<Result<HashMap<_, _>, StartupError>>()?;

        log::info!(
            "built {} pipelines ({:?}, {}x MSAA, depth {:?})",
            pipelines.len(),
            spec.color_format,
            spec.sample_count,
            spec.depth_format
        );

        Ok(Self {
            layouts,
            pipelines,
            depth_state,
        })
    }

    fn build_pipeline(
        device: &wgpu::Device,
        module: &wgpu::ShaderModule,
        layouts: &BindLayouts,
        pair: ProgramPair,
        spec: AttachmentSpec,
        depth_state: DepthCompareState,
    ) -> Result<PipelineState, StartupError> {
        // Interface mismatches (vertex locations, bind groups) only show up
        // here; keep them off wgpu's panicking default handler.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let mut groups = vec![&layouts.transforms, &layouts.lighting];
        if pair.uses_material {
            groups.push(&layouts.material);
        }

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("meridian {} pipeline layout", pair.name)),
            bind_group_layouts: &groups,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("meridian {} pipeline", pair.name)),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some(pair.vertex),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some(pair.fragment),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: spec.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_state.to_wgpu(spec.depth_format)),
            multisample: wgpu::MultisampleState {
                count: spec.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(StartupError::PipelineCreation {
                name: pair.name.to_owned(),
                message: err.to_string(),
            });
        }

        log::debug!("pipeline `{}` = {} + {}", pair.name, pair.vertex, pair.fragment);

        Ok(PipelineState {
            name: pair.name,
            sample_count: spec.sample_count,
            uses_material: pair.uses_material,
            pipeline,
        })
    }

    pub fn get(&self, name: &str) -> Result<&PipelineState, StartupError> {
        self.pipelines
            .get(name)
            .ok_or_else(|| StartupError::MissingPipeline(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    pub fn depth_state(&self) -> DepthCompareState {
        self.depth_state
    }

    pub fn layouts(&self) -> &BindLayouts {
        &self.layouts
    }
}
