//! Per-object uniform storage, N-buffered and gated by completion fences.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::paint::Color;

// ── uniform layouts ───────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    pub light_color: [f32; 4],
    pub light_position: [f32; 4], // w = 1
    pub camera_position: [f32; 4], // w = 1
}

impl LightingUniform {
    pub fn new(light_color: Color, light_position: Vec3, camera_position: Vec3) -> Self {
        Self {
            light_color: light_color.to_array(),
            light_position: light_position.extend(1.0).to_array(),
            camera_position: camera_position.extend(1.0).to_array(),
        }
    }
}

// ── ring ──────────────────────────────────────────────────────────────────

struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One uniform buffer + bind group per frame slot.
pub struct UniformRing<T> {
    slots: Vec<UniformSlot>,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformRing<T> {
    pub fn binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<T>() as u64)
    }

    /// Layout entry for binding 0 of a group holding one `T`.
    pub fn layout_entry(visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Self::binding_size(),
            },
            count: None,
        }
    }

    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        slots: usize,
        label: &str,
    ) -> Self {
        let slots = (0..slots.max(1))
            .map(|i| {
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("{label} ubo #{i}")),
                    size: std::mem::size_of::<T>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{label} bind group #{i}")),
                    layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                UniformSlot { buffer, bind_group }
            })
            .collect();

        Self {
            slots,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Writes `value` into `slot`. The slot must not be in use by the GPU.
    pub fn write(&self, queue: &wgpu::Queue, slot: usize, value: &T) {
        let slot = &self.slots[slot % self.slots.len()];
        queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(value));
    }

    pub fn bind_group(&self, slot: usize) -> &wgpu::BindGroup {
        &self.slots[slot % self.slots.len()].bind_group
    }
}

// ── fences ────────────────────────────────────────────────────────────────

/// Completion flags for each frame slot.
///
/// A slot is free once the GPU has finished the submission that last used it.
/// [`FrameFences::acquire`] blocks on the device only when the slot about to
/// be reused is still pending.
pub struct FrameFences {
    signalled: Vec<Arc<AtomicBool>>,
    next: usize,
    waits: u64,
}

impl FrameFences {
    pub fn new(slots: usize) -> Self {
        Self {
            signalled: (0..slots.max(1))
                .map(|_| Arc::new(AtomicBool::new(true)))
                .collect(),
            next: 0,
            waits: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.signalled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signalled.is_empty()
    }

    /// Number of times `acquire` had to block.
    pub fn waits(&self) -> u64 {
        self.waits
    }

    /// Claims the next slot, waiting for the device if it is still in flight.
    pub fn acquire(&mut self, device: &wgpu::Device) -> usize {
        self.acquire_with(|| {
            if let Err(e) = device.poll(wgpu::PollType::wait_indefinitely()) {
                log::warn!("device poll failed while waiting for frame slot: {e}");
            }
        })
    }

    fn acquire_with(&mut self, wait: impl FnOnce()) -> usize {
        let slot = self.next;
        let flag = &self.signalled[slot];
        if !flag.load(Ordering::Acquire) {
            log::trace!("frame slot {slot} still in flight, waiting");
            self.waits += 1;
            wait();
            // A completed wait means every prior submission has finished.
            flag.store(true, Ordering::Release);
        }
        flag.store(false, Ordering::Release);
        self.next = (slot + 1) % self.signalled.len();
        slot
    }

    /// Arms `slot`'s fence for the work just submitted on `queue`.
    pub fn signal_on_completion(&self, queue: &wgpu::Queue, slot: usize) {
        let flag = Arc::clone(&self.signalled[slot]);
        queue.on_submitted_work_done(move || flag.store(true, Ordering::Release));
    }
}
