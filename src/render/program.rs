use crate::core::shader::{self, CompiledShader, UniformTable};
use crate::error::EffectError;
use naga::ShaderStage;

/// A compiled stage: validated IR plus the device module.
pub(crate) struct GpuShader {
    pub(crate) ir: CompiledShader,
    pub(crate) module: wgpu::ShaderModule,
}

/// A linked pipeline with its reflected uniform table and uniform buffer.
pub(crate) struct Program {
    pub(crate) label: &'static str,
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniforms: UniformTable,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) uniform_group: wgpu::BindGroup,
}

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

pub(crate) async fn compile(
    device: &wgpu::Device,
    label: &'static str,
    source: &'static str,
    stage: ShaderStage,
) -> Result<GpuShader, EffectError> {
    let ir = shader::compile(label, source, stage).inspect_err(|e| log::error!("{}", e))?;
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = device.pop_error_scope().await {
        let e = EffectError::Compile {
            label: label.to_string(),
            stage: format!("{:?}", stage).to_lowercase(),
            diagnostic: err.to_string(),
        };
        log::error!("{}", e);
        return Err(e);
    }
    Ok(GpuShader { ir, module })
}

pub(crate) async fn link(
    device: &wgpu::Device,
    label: &'static str,
    vertex: &GpuShader,
    fragment: &GpuShader,
    texture_layout: &wgpu::BindGroupLayout,
    color_format: wgpu::TextureFormat,
) -> Result<Program, EffectError> {
    let link_error = |diagnostic: String| {
        let e = EffectError::Link {
            label: label.to_string(),
            diagnostic,
        };
        log::error!("{}", e);
        e
    };
    if vertex.ir.stage != ShaderStage::Vertex {
        return Err(link_error(format!("`{}` is not a vertex shader", vertex.ir.label)));
    }
    if fragment.ir.stage != ShaderStage::Fragment {
        return Err(link_error(format!("`{}` is not a fragment shader", fragment.ir.label)));
    }

    let uniforms = UniformTable::for_program(&vertex.ir.module, &fragment.ir.module);
    let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: uniforms.size() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let uniform_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &uniform_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[&uniform_layout, texture_layout],
        push_constant_ranges: &[],
    });

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &vertex.module,
            entry_point: Some(vertex.ir.entry_point.as_str()),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: (2 * std::mem::size_of::<f32>()) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &QUAD_ATTRIBUTES,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &fragment.module,
            entry_point: Some(fragment.ir.entry_point.as_str()),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });
    if let Some(err) = device.pop_error_scope().await {
        return Err(link_error(err.to_string()));
    }
    log::info!(
        "[gpu] linked `{}` ({} uniforms, {} bytes)",
        label,
        uniforms.len(),
        uniforms.size()
    );

    Ok(Program {
        label,
        pipeline,
        uniforms,
        uniform_buffer,
        uniform_group,
    })
}
