use super::attachments::AttachmentSet;

/// Fixed part of the per-frame render pass: clear values and load/store policy.
///
/// wgpu pass descriptors borrow their views, so the descriptor itself is
/// assembled each frame from this template plus the current attachments and
/// drawable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PassTemplate {
    pub clear_color: wgpu::Color,
    pub clear_depth: f32,
}

impl PassTemplate {
    pub fn new(clear_color: wgpu::Color) -> Self {
        Self {
            clear_color,
            clear_depth: 1.0,
        }
    }

    /// Color attachment: render into the multisampled target and resolve into
    /// `drawable`, or render into `drawable` directly without MSAA.
    pub fn color_attachment<'a>(
        &self,
        attachments: &'a AttachmentSet,
        drawable: &'a wgpu::TextureView,
    ) -> wgpu::RenderPassColorAttachment<'a> {
        let load = wgpu::LoadOp::Clear(self.clear_color);
        match attachments.msaa_view() {
            // Only the resolved image is kept.
            Some(msaa) => wgpu::RenderPassColorAttachment {
                view: msaa,
                resolve_target: Some(drawable),
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Discard,
                },
                depth_slice: None,
            },
            None => wgpu::RenderPassColorAttachment {
                view: drawable,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            },
        }
    }

    pub fn depth_attachment<'a>(
        &self,
        attachments: &'a AttachmentSet,
    ) -> wgpu::RenderPassDepthStencilAttachment<'a> {
        wgpu::RenderPassDepthStencilAttachment {
            view: attachments.depth_view(),
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_depth),
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops: None,
        }
    }

    /// Opens the frame's render pass on `encoder`.
    pub fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        attachments: &AttachmentSet,
        drawable: &wgpu::TextureView,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("meridian scene pass"),
            color_attachments: &[Some(self.color_attachment(attachments, drawable))],
            depth_stencil_attachment: Some(self.depth_attachment(attachments)),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
