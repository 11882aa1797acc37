//! Water ripple effect: a damped wave-equation simulation over a ping-pong
//! state field, and a composite stage that refracts a background through the
//! resulting surface and adds a specular highlight.
//!
//! The CPU kernels in [`simulation`] and [`shading`] are the reference the
//! WGSL shaders follow; the `gpu` feature adds a wgpu renderer that runs the
//! same two passes on the GPU.

pub mod disturbance;
pub mod params;
pub mod shading;
pub mod simulation;
pub mod state;
pub mod uniforms;

#[cfg(feature = "gpu")]
pub mod gpu;

pub use disturbance::Disturbance;
pub use params::{ParamsError, RippleParams};
pub use shading::{Background, BackgroundImage};
pub use simulation::{FrameInputs, RippleSimulation};
pub use state::{CellState, FieldError, PingPong, StateField};

// Shaders bundled as string constants
pub static SIMULATION_WGSL: &str = include_str!("../shaders/simulation.wgsl");
pub static COMPOSITE_WGSL: &str = include_str!("../shaders/composite.wgsl");
