use super::context::FIELD_FORMAT;
use super::helpers;
use crate::core::{DoubleBuffer, TargetSize};

/// Offscreen float color target plus the bind group that samples it.
///
/// `sample_group` is what "binding the read texture" means here: the pass
/// that consumes the field sets it as group 1.
pub(crate) struct RenderTarget {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sample_group: wgpu::BindGroup,
}

impl TargetSize for RenderTarget {
    fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

impl RenderTarget {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        width: u32,
        height: u32,
    ) -> Self {
        let (texture, view) = helpers::create_color_texture(
            device,
            label,
            width,
            height,
            FIELD_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let sample_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        Self {
            texture,
            view,
            sample_group,
        }
    }
}

fn allocator<'a>(
    device: &'a wgpu::Device,
    layout: &'a wgpu::BindGroupLayout,
    sampler: &'a wgpu::Sampler,
) -> impl FnMut(u32, u32) -> RenderTarget + 'a {
    let mut n = 0;
    move |w, h| {
        n += 1;
        RenderTarget::new(device, layout, sampler, &format!("field_{}", n), w, h)
    }
}

/// Allocates the velocity field pair and clears both halves.
pub(crate) fn create_field(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
) -> DoubleBuffer<RenderTarget> {
    let field = DoubleBuffer::create(
        width.max(1),
        height.max(1),
        allocator(device, layout, sampler),
    );
    clear_field(device, queue, &field);
    field
}

/// Swaps in a cleared pair at the new size. Returns `false` for a zero size.
pub(crate) fn resize_field(
    field: &mut DoubleBuffer<RenderTarget>,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
) -> bool {
    if !field.recreate(width, height, allocator(device, layout, sampler)) {
        return false;
    }
    clear_field(device, queue, field);
    true
}

fn clear_field(device: &wgpu::Device, queue: &wgpu::Queue, field: &DoubleBuffer<RenderTarget>) {
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("field_clear"),
    });
    for target in [field.read(), field.write()] {
        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("field_clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        drop(pass);
    }
    queue.submit(Some(encoder.finish()));
    let (width, height) = field.size();
    log::debug!("[render] velocity field {}x{}", width, height);
}
