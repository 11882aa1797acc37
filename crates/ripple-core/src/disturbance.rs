use crate::params::RippleParams;
use glam::Vec2;

/// A pointer-driven point disturbance, in pixel coordinates of the
/// simulation grid (`x` right, `y` along increasing UV `v`).
///
/// Activity is carried by `Option<Disturbance>`; there is no sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disturbance {
    pub position_px: Vec2,
}

impl Disturbance {
    #[inline]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position_px: Vec2::new(x, y),
        }
    }

    /// Convert a raw mouse uniform that uses `x <= 0` to mean "inactive".
    ///
    /// The comparison is kept literal, so a pointer exactly on the left edge
    /// (`x == 0`) is treated as inactive on this path.
    #[inline]
    pub fn from_mouse(mouse: [f32; 2]) -> Option<Self> {
        (mouse[0] > 0.0).then(|| Self::at(mouse[0], mouse[1]))
    }

    /// Position in UV space for a grid of `resolution` pixels.
    #[inline]
    pub fn uv(&self, resolution: Vec2) -> Vec2 {
        self.position_px / resolution
    }
}

/// Pressure added to a cell at UV distance `dist` from the disturbance.
///
/// Linear falloff: `strength` at the centre, exactly zero at the radius and
/// beyond.
#[inline]
pub fn impulse(dist: f32, params: &RippleParams) -> f32 {
    if dist <= params.disturbance_radius {
        params.disturbance_strength * (1.0 - dist / params.disturbance_radius)
    } else {
        0.0
    }
}

/// Pack an optional disturbance into the `(mouse, active)` pair the GPU
/// uniform block carries.
#[inline]
pub fn to_uniform(disturbance: Option<Disturbance>) -> ([f32; 2], u32) {
    match disturbance {
        Some(d) => (d.position_px.to_array(), 1),
        None => ([0.0, 0.0], 0),
    }
}
