use super::program::Program;
use super::targets::RenderTarget;
use crate::core::TargetSize;
use wgpu::util::DeviceExt;

const QUAD_VERTICES: [f32; 8] = [-1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0, -1.0];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Two-triangle clip-space quad shared by every pass.
pub(crate) struct FullscreenQuad {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
}

impl FullscreenQuad {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vertices, indices }
    }
}

pub(crate) enum BlitTarget<'a> {
    /// The visible canvas; viewport is its full pixel size.
    Surface {
        view: &'a wgpu::TextureView,
        width: u32,
        height: u32,
    },
    /// An offscreen target; viewport is its stored size.
    Offscreen(&'a RenderTarget),
}

/// Draws the quad with `program` into `target`. The program's uniform block
/// and `sample` (group 1) fully determine the output.
pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    quad: &FullscreenQuad,
    program: &Program,
    sample: &wgpu::BindGroup,
    target: BlitTarget<'_>,
) {
    let (view, (width, height)) = match target {
        BlitTarget::Surface {
            view,
            width,
            height,
        } => (view, (width, height)),
        BlitTarget::Offscreen(t) => (&t.view, t.size()),
    };
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(program.label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
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
    r.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
    r.set_pipeline(&program.pipeline);
    r.set_bind_group(0, &program.uniform_group, &[]);
    r.set_bind_group(1, sample, &[]);
    r.set_vertex_buffer(0, quad.vertices.slice(..));
    r.set_index_buffer(quad.indices.slice(..), wgpu::IndexFormat::Uint16);
    r.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    drop(r);
}
