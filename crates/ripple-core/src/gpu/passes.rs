use super::helpers;
use crate::uniforms::{ShadeUniforms, SimUniforms};

/// Format of the ping-pong state targets: four unfilterable `f32` channels.
pub const STATE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Pipeline and uniforms of the simulation kernel.
pub(crate) struct SimulationPass {
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
}

pub(crate) fn create_simulation_pass(device: &wgpu::Device) -> SimulationPass {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("simulation_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::SIMULATION_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("simulation_bgl"),
        entries: &[
            helpers::uniform_entry(0),
            helpers::uniform_entry(1),
            helpers::texture_entry(2, false),
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("simulation_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let pipeline = helpers::make_quad_pipeline(
        device,
        "simulation_pipeline",
        &pl,
        &shader,
        "fs_simulate",
        STATE_FORMAT,
    );
    let uniform_buffer = helpers::uniform_buffer::<SimUniforms>(device, "simulation_uniforms");

    SimulationPass {
        bgl,
        pipeline,
        uniform_buffer,
    }
}

impl SimulationPass {
    /// Bind group that reads `state` as the previous frame.
    pub(crate) fn bind_group(
        &self,
        device: &wgpu::Device,
        transform: &wgpu::Buffer,
        state: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("simulation_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(state),
                },
            ],
        })
    }
}

/// Pipeline, uniforms and background sampler of the composite kernel.
pub(crate) struct CompositePass {
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) sampler: wgpu::Sampler,
}

pub(crate) fn create_composite_pass(
    device: &wgpu::Device,
    output_format: wgpu::TextureFormat,
) -> CompositePass {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("composite_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::COMPOSITE_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("composite_bgl"),
        entries: &[
            helpers::uniform_entry(0),
            helpers::uniform_entry(1),
            helpers::texture_entry(2, false),
            helpers::texture_entry(3, true),
            wgpu::BindGroupLayoutEntry {
                binding: 4,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("composite_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let pipeline = helpers::make_quad_pipeline(
        device,
        "composite_pipeline",
        &pl,
        &shader,
        "fs_composite",
        output_format,
    );
    let uniform_buffer = helpers::uniform_buffer::<ShadeUniforms>(device, "composite_uniforms");
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("background_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    CompositePass {
        bgl,
        pipeline,
        uniform_buffer,
        sampler,
    }
}

impl CompositePass {
    /// Bind group that shades from `state` over `background`.
    pub(crate) fn bind_group(
        &self,
        device: &wgpu::Device,
        transform: &wgpu::Buffer,
        state: &wgpu::TextureView,
        background: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("composite_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(state),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(background),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}
