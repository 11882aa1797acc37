//! wgpu execution of the two kernels.
//!
//! Each frame records two render passes into one encoder: the simulation
//! pass renders the next state into the write target, the targets swap, and
//! the composite pass shades the fresh state into the caller's view.

mod background;
mod helpers;
mod passes;
mod targets;

pub use background::{BackgroundTexture, BACKGROUND_FORMAT};
pub use passes::STATE_FORMAT;
pub use targets::{StateTarget, StateTargets};

use crate::disturbance::Disturbance;
use crate::params::RippleParams;
use crate::shading::BackgroundImage;
use crate::uniforms::{ShadeUniforms, SimUniforms, TransformUniforms};
use helpers::QuadGeometry;
use passes::{CompositePass, SimulationPass};

pub struct RippleRenderer {
    simulation: SimulationPass,
    composite: CompositePass,
    quad: QuadGeometry,
    transform_buffer: wgpu::Buffer,
    background: BackgroundTexture,
    targets: StateTargets,
    params: RippleParams,
    frame: u32,
}

impl RippleRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        params: RippleParams,
        background: &BackgroundImage,
    ) -> Self {
        let simulation = passes::create_simulation_pass(device);
        let composite = passes::create_composite_pass(device, output_format);
        let quad = QuadGeometry::new(device);
        let transform_buffer =
            helpers::uniform_buffer::<TransformUniforms>(device, "transform_uniforms");
        queue.write_buffer(
            &transform_buffer,
            0,
            bytemuck::bytes_of(&TransformUniforms::identity()),
        );
        queue.write_buffer(
            &composite.uniform_buffer,
            0,
            bytemuck::bytes_of(&ShadeUniforms::from_params(&params)),
        );
        let background = BackgroundTexture::from_image(device, queue, background);
        let targets = StateTargets::new(
            device,
            &simulation,
            &composite,
            &transform_buffer,
            &background.view,
            width,
            height,
        );
        log::info!(
            "ripple renderer: {}x{} state, output {:?}",
            targets.size().0,
            targets.size().1,
            output_format
        );
        Self {
            simulation,
            composite,
            quad,
            transform_buffer,
            background,
            targets,
            params,
            frame: 0,
        }
    }

    /// Recreate the state targets at a new size. The next frame cold-starts.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.targets.size() == (width.max(1), height.max(1)) {
            return;
        }
        self.targets = StateTargets::new(
            device,
            &self.simulation,
            &self.composite,
            &self.transform_buffer,
            &self.background.view,
            width,
            height,
        );
        self.frame = 0;
        log::debug!("ripple targets resized to {}x{}", width, height);
    }

    /// Cold-start on the next frame.
    pub fn reset(&mut self) {
        self.frame = 0;
        log::debug!("ripple reset");
    }

    pub fn set_params(&mut self, queue: &wgpu::Queue, params: RippleParams) {
        self.params = params;
        queue.write_buffer(
            &self.composite.uniform_buffer,
            0,
            bytemuck::bytes_of(&ShadeUniforms::from_params(&params)),
        );
    }

    pub fn set_transform(&self, queue: &wgpu::Queue, model_view_projection: glam::Mat4) {
        queue.write_buffer(
            &self.transform_buffer,
            0,
            bytemuck::bytes_of(&TransformUniforms::from_mat4(model_view_projection)),
        );
    }

    pub fn set_background(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &BackgroundImage,
    ) {
        let texture = BackgroundTexture::from_image(device, queue, image);
        self.set_background_texture(device, texture);
    }

    /// Swap in a background the caller has already filled, e.g. by an
    /// external image copy.
    pub fn set_background_texture(&mut self, device: &wgpu::Device, background: BackgroundTexture) {
        self.background = background;
        self.targets.rebind_background(
            device,
            &self.composite,
            &self.transform_buffer,
            &self.background.view,
        );
    }

    /// Record one simulation step and the composite into `target`.
    pub fn encode_frame(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        time: f32,
        disturbance: Option<Disturbance>,
    ) {
        let (w, h) = self.targets.size();
        let uniforms = SimUniforms::new(
            self.frame,
            time,
            disturbance,
            [w as f32, h as f32],
            &self.params,
        );
        queue.write_buffer(
            &self.simulation.uniform_buffer,
            0,
            bytemuck::bytes_of(&uniforms),
        );

        helpers::draw_quad(
            encoder,
            "simulation_pass",
            &self.targets.write().view,
            &self.simulation.pipeline,
            &self.targets.read().simulate_bg,
            &self.quad,
        );
        self.targets.swap();
        helpers::draw_quad(
            encoder,
            "composite_pass",
            target,
            &self.composite.pipeline,
            &self.targets.read().composite_bg,
            &self.quad,
        );
        self.frame = self.frame.saturating_add(1);
    }

    /// Composite the current state without stepping the simulation.
    pub fn encode_still(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        helpers::draw_quad(
            encoder,
            "composite_pass",
            target,
            &self.composite.pipeline,
            &self.targets.read().composite_bg,
            &self.quad,
        );
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn size(&self) -> (u32, u32) {
        self.targets.size()
    }

    pub fn params(&self) -> &RippleParams {
        &self.params
    }

    pub fn targets(&self) -> &StateTargets {
        &self.targets
    }
}
