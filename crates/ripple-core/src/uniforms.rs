//! GPU-side layouts shared by both kernels.
//!
//! Field order and padding mirror the WGSL structs in `shaders/`; keep them
//! in sync when either side changes.

use crate::disturbance::{self, Disturbance};
use crate::params::RippleParams;
use glam::Mat4;

/// Vertex-stage transform (model-view-projection).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniforms {
    pub model_view_projection: [[f32; 4]; 4],
}

impl TransformUniforms {
    pub fn from_mat4(m: Mat4) -> Self {
        Self {
            model_view_projection: m.to_cols_array_2d(),
        }
    }

    /// Identity, for the full-screen quad.
    pub fn identity() -> Self {
        Self::from_mat4(Mat4::IDENTITY)
    }
}

/// Simulation kernel inputs: per-frame values first, then parameters.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SimUniforms {
    pub mouse: [f32; 2],
    pub resolution: [f32; 2],
    pub time: f32,
    pub frame: u32,
    pub mouse_active: u32,
    pub _pad0: u32,
    pub delta: f32,
    pub restoring_force: f32,
    pub velocity_damping: f32,
    pub pressure_decay: f32,
    pub disturbance_radius: f32,
    pub disturbance_strength: f32,
    pub _pad1: [f32; 2],
}

impl SimUniforms {
    pub fn new(
        frame: u32,
        time: f32,
        disturbance: Option<Disturbance>,
        resolution: [f32; 2],
        params: &RippleParams,
    ) -> Self {
        let (mouse, mouse_active) = disturbance::to_uniform(disturbance);
        Self {
            mouse,
            resolution,
            time,
            frame,
            mouse_active,
            _pad0: 0,
            delta: params.delta,
            restoring_force: params.restoring_force,
            velocity_damping: params.velocity_damping,
            pressure_decay: params.pressure_decay,
            disturbance_radius: params.disturbance_radius,
            disturbance_strength: params.disturbance_strength,
            _pad1: [0.0; 2],
        }
    }
}

/// Composite kernel inputs.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadeUniforms {
    /// Normalized light direction in `xyz`; `w` unused.
    pub light_dir: [f32; 4],
    pub distortion_scale: f32,
    pub normal_slope: f32,
    pub normal_height: f32,
    pub specular_exponent: f32,
    pub specular_intensity: f32,
    pub _pad: [f32; 3],
}

impl ShadeUniforms {
    pub fn from_params(params: &RippleParams) -> Self {
        Self {
            light_dir: params.light_dir().extend(0.0).to_array(),
            distortion_scale: params.distortion_scale,
            normal_slope: params.normal_slope,
            normal_height: params.normal_height,
            specular_exponent: params.specular_exponent,
            specular_intensity: params.specular_intensity,
            _pad: [0.0; 3],
        }
    }
}

/// Quad vertex: object-space position and UV.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Viewport-filling quad. UV `(0, 0)` is the top-left corner, matching
/// pointer pixel coordinates and texture row order.
pub const FULLSCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex {
        position: [-1.0, 1.0, 0.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0, 0.0],
        uv: [1.0, 0.0],
    },
    QuadVertex {
        position: [1.0, -1.0, 0.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, -1.0, 0.0],
        uv: [0.0, 1.0],
    },
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];
