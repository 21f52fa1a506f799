use crate::core::{DoubleBuffer, FrameDriver, UniformTable, FULLSCREEN_WGSL, OUTPUT_WGSL, SPEED_WGSL};
use crate::core::{OUTPUT_PROGRAM, SPEED_PROGRAM};
use crate::error::EffectError;
use naga::ShaderStage;
use web_sys as web;

mod blit;
mod context;
mod helpers;
mod program;
mod targets;

use blit::{BlitTarget, FullscreenQuad};
use context::GpuContext;
use program::Program;
use targets::RenderTarget;

/// GPU half of the effect: two linked programs, the quad and the velocity
/// field ping-pong.
pub struct Renderer {
    ctx: GpuContext,
    speed: Program,
    output: Program,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad: FullscreenQuad,
    field: DoubleBuffer<RenderTarget>,
}

impl Renderer {
    pub async fn new(canvas: web::HtmlCanvasElement) -> Result<Self, EffectError> {
        let ctx = GpuContext::new(canvas).await?;
        let device = &ctx.device;

        let texture_layout = helpers::create_texture_layout(device);
        let sampler = helpers::create_field_sampler(device);

        let vertex =
            program::compile(device, "fullscreen", FULLSCREEN_WGSL, ShaderStage::Vertex).await?;
        let speed_fs = program::compile(device, SPEED_PROGRAM, SPEED_WGSL, ShaderStage::Fragment).await?;
        let output_fs =
            program::compile(device, OUTPUT_PROGRAM, OUTPUT_WGSL, ShaderStage::Fragment).await?;

        let speed = program::link(
            device,
            SPEED_PROGRAM,
            &vertex,
            &speed_fs,
            &texture_layout,
            context::FIELD_FORMAT,
        )
        .await?;
        let output = program::link(
            device,
            OUTPUT_PROGRAM,
            &vertex,
            &output_fs,
            &texture_layout,
            ctx.config.format,
        )
        .await?;

        let quad = FullscreenQuad::new(device);
        let (width, height) = ctx.size();
        let field = targets::create_field(device, &ctx.queue, &texture_layout, &sampler, width, height);

        Ok(Self {
            ctx,
            speed,
            output,
            texture_layout,
            sampler,
            quad,
            field,
        })
    }

    pub fn speed_uniforms(&self) -> &UniformTable {
        &self.speed.uniforms
    }

    pub fn output_uniforms(&self) -> &UniformTable {
        &self.output.uniforms
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.ctx.size()
    }

    /// Reconfigures the surface and reallocates the velocity field. Previous
    /// field contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        let resized = targets::resize_field(
            &mut self.field,
            &self.ctx.device,
            &self.ctx.queue,
            &self.texture_layout,
            &self.sampler,
            width,
            height,
        );
        if !resized {
            return;
        }
        self.ctx.resize(width, height);
        log::info!("[render] resized to {}x{}", width, height);
    }

    pub fn reconfigure(&mut self) {
        self.ctx.reconfigure();
    }

    /// Uploads the driver's uniform blocks and runs the two passes: velocity
    /// (read half into write half), swap, then output to the canvas sampling
    /// the freshly written field.
    pub fn render(&mut self, driver: &FrameDriver) -> Result<(), wgpu::SurfaceError> {
        let queue = &self.ctx.queue;
        queue.write_buffer(&self.speed.uniform_buffer, 0, driver.speed_block().as_bytes());
        queue.write_buffer(&self.output.uniform_buffer, 0, driver.output_block().as_bytes());

        let frame = self.ctx.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame"),
            });

        blit::blit(
            &mut encoder,
            &self.quad,
            &self.speed,
            &self.field.read().sample_group,
            BlitTarget::Offscreen(self.field.write()),
        );
        self.field.swap();

        let (width, height) = self.ctx.size();
        blit::blit(
            &mut encoder,
            &self.quad,
            &self.output,
            &self.field.read().sample_group,
            BlitTarget::Surface {
                view: &view,
                width,
                height,
            },
        );

        queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
