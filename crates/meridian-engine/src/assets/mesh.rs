use wgpu::util::DeviceExt;

use crate::scene::{GeometryFactory, Shape, Vertex};

/// Immutable vertex buffer for one mesh.
///
/// The buffer is released when this value is dropped.
pub struct GeometryBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl GeometryBuffer {
    pub fn from_vertices(device: &wgpu::Device, label: &str, vertices: &[Vertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    /// Generates and uploads the vertices for `shape`.
    pub fn from_shape(device: &wgpu::Device, shape: Shape) -> Self {
        let vertices = GeometryFactory::build(shape);
        log::debug!("uploading {shape:?}: {} vertices", vertices.len());
        Self::from_vertices(device, &format!("meridian {shape:?} vertices"), &vertices)
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
