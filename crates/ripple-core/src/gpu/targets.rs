use super::helpers;
use super::passes::{CompositePass, SimulationPass, STATE_FORMAT};
use crate::state::PingPong;

/// One state render target and the bind groups that read from it.
pub struct StateTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub(crate) simulate_bg: wgpu::BindGroup,
    pub(crate) composite_bg: wgpu::BindGroup,
}

/// The two state targets. The simulation pass reads `read()` and renders
/// into `write()`; after `swap()` the fresh state is read by the composite
/// pass and by next frame's simulation.
pub struct StateTargets {
    pub(crate) targets: PingPong<StateTarget>,
    width: u32,
    height: u32,
}

impl StateTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        simulation: &SimulationPass,
        composite: &CompositePass,
        transform: &wgpu::Buffer,
        background: &wgpu::TextureView,
        width: u32,
        height: u32,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let make = |label: &str| {
            let (texture, view) = helpers::create_color_texture(
                device,
                label,
                width,
                height,
                STATE_FORMAT,
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            );
            let simulate_bg = simulation.bind_group(device, transform, &view);
            let composite_bg = composite.bind_group(device, transform, &view, background);
            StateTarget {
                texture,
                view,
                simulate_bg,
                composite_bg,
            }
        };
        Self {
            targets: PingPong::new(make("state_a"), make("state_b")),
            width,
            height,
        }
    }

    /// Rebuild the composite bind groups after the background changed.
    pub(crate) fn rebind_background(
        &mut self,
        device: &wgpu::Device,
        composite: &CompositePass,
        transform: &wgpu::Buffer,
        background: &wgpu::TextureView,
    ) {
        for target in self.targets.both_mut() {
            target.composite_bg = composite.bind_group(device, transform, &target.view, background);
        }
    }

    pub fn read(&self) -> &StateTarget {
        self.targets.read()
    }

    pub fn write(&self) -> &StateTarget {
        self.targets.write()
    }

    pub fn swap(&mut self) {
        self.targets.swap();
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
