//! Tuning parameters for the ripple simulation and shading kernels.
//!
//! The defaults reproduce the effect's reference constants exactly; changing
//! them is supported but a default-configured run is what the GPU and CPU
//! kernels are compared against.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed time-step scale of the wave update.
pub const DEFAULT_DELTA: f32 = 1.4;
/// Restoring force pulling pressure back toward rest.
pub const DEFAULT_RESTORING_FORCE: f32 = 0.005;
/// Velocity damping per step (scaled by `delta`).
pub const DEFAULT_VELOCITY_DAMPING: f32 = 0.002;
/// Multiplicative pressure decay per step.
pub const DEFAULT_PRESSURE_DECAY: f32 = 0.999;
/// Disturbance radius in UV units.
pub const DEFAULT_DISTURBANCE_RADIUS: f32 = 0.02;
/// Pressure added at the disturbance centre.
pub const DEFAULT_DISTURBANCE_STRENGTH: f32 = 2.0;

/// Gradient to UV offset scale for the refraction lookup.
pub const DEFAULT_DISTORTION_SCALE: f32 = 0.03;
/// Gradient weight in the synthesized normal.
pub const DEFAULT_NORMAL_SLOPE: f32 = 2.0;
/// Height weight in the synthesized normal (flat vs. steep response).
pub const DEFAULT_NORMAL_HEIGHT: f32 = 0.5;
/// Unnormalized light direction.
pub const DEFAULT_LIGHT_DIRECTION: [f32; 3] = [-3.0, 10.0, 3.0];
/// Highlight tightness.
pub const DEFAULT_SPECULAR_EXPONENT: f32 = 60.0;
/// Highlight intensity.
pub const DEFAULT_SPECULAR_INTENSITY: f32 = 1.5;

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("light direction must not be zero-length")]
    ZeroLightDirection,
}

/// Parameters for both kernels.
///
/// Deserializes with per-field defaults, so a settings file only needs the
/// fields it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleParams {
    pub delta: f32,
    pub restoring_force: f32,
    pub velocity_damping: f32,
    pub pressure_decay: f32,
    pub disturbance_radius: f32,
    pub disturbance_strength: f32,

    pub distortion_scale: f32,
    pub normal_slope: f32,
    pub normal_height: f32,
    pub light_direction: [f32; 3],
    pub specular_exponent: f32,
    pub specular_intensity: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            restoring_force: DEFAULT_RESTORING_FORCE,
            velocity_damping: DEFAULT_VELOCITY_DAMPING,
            pressure_decay: DEFAULT_PRESSURE_DECAY,
            disturbance_radius: DEFAULT_DISTURBANCE_RADIUS,
            disturbance_strength: DEFAULT_DISTURBANCE_STRENGTH,
            distortion_scale: DEFAULT_DISTORTION_SCALE,
            normal_slope: DEFAULT_NORMAL_SLOPE,
            normal_height: DEFAULT_NORMAL_HEIGHT,
            light_direction: DEFAULT_LIGHT_DIRECTION,
            specular_exponent: DEFAULT_SPECULAR_EXPONENT,
            specular_intensity: DEFAULT_SPECULAR_INTENSITY,
        }
    }
}

impl RippleParams {
    /// Builder-style override of the light direction.
    pub fn with_light_direction(mut self, direction: [f32; 3]) -> Self {
        self.light_direction = direction;
        self
    }

    /// Builder-style override of the specular intensity.
    pub fn with_specular_intensity(mut self, intensity: f32) -> Self {
        self.specular_intensity = intensity;
        self
    }

    /// Normalized light direction. Callers should `validate()` first; a
    /// zero vector normalizes to zero here rather than NaN.
    pub fn light_dir(&self) -> glam::Vec3 {
        glam::Vec3::from_array(self.light_direction).normalize_or_zero()
    }

    /// Check every field for values that would make the kernels diverge or
    /// produce NaNs.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let fields: [(&'static str, f32); 11] = [
            ("delta", self.delta),
            ("restoring_force", self.restoring_force),
            ("velocity_damping", self.velocity_damping),
            ("pressure_decay", self.pressure_decay),
            ("disturbance_radius", self.disturbance_radius),
            ("disturbance_strength", self.disturbance_strength),
            ("distortion_scale", self.distortion_scale),
            ("normal_slope", self.normal_slope),
            ("normal_height", self.normal_height),
            ("specular_exponent", self.specular_exponent),
            ("specular_intensity", self.specular_intensity),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { name, value });
            }
        }
        for value in self.light_direction {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite {
                    name: "light_direction",
                    value,
                });
            }
        }

        for (name, value) in [
            ("delta", self.delta),
            ("disturbance_radius", self.disturbance_radius),
            ("specular_exponent", self.specular_exponent),
        ] {
            if value <= 0.0 {
                return Err(ParamsError::NotPositive { name, value });
            }
        }

        if self.pressure_decay <= 0.0 || self.pressure_decay > 1.0 {
            return Err(ParamsError::OutOfRange {
                name: "pressure_decay",
                value: self.pressure_decay,
                min: 0.0,
                max: 1.0,
            });
        }
        // velocity is scaled by (1 - velocity_damping * delta) each step
        let velocity_keep = 1.0 - self.velocity_damping * self.delta;
        if !(0.0..=1.0).contains(&velocity_keep) {
            return Err(ParamsError::OutOfRange {
                name: "velocity_damping",
                value: self.velocity_damping,
                min: 0.0,
                max: 1.0 / self.delta,
            });
        }

        if glam::Vec3::from_array(self.light_direction).length_squared() == 0.0 {
            return Err(ParamsError::ZeroLightDirection);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let p = RippleParams::default();
        assert_eq!(p.delta, 1.4);
        assert_eq!(p.restoring_force, 0.005);
        assert_eq!(p.velocity_damping, 0.002);
        assert_eq!(p.pressure_decay, 0.999);
        assert_eq!(p.disturbance_radius, 0.02);
        assert_eq!(p.disturbance_strength, 2.0);
        assert_eq!(p.distortion_scale, 0.03);
        assert_eq!(p.normal_slope, 2.0);
        assert_eq!(p.normal_height, 0.5);
        assert_eq!(p.light_direction, [-3.0, 10.0, 3.0]);
        assert_eq!(p.specular_exponent, 60.0);
        assert_eq!(p.specular_intensity, 1.5);
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn light_dir_is_normalized() {
        let l = RippleParams::default().light_dir();
        assert!((l.length() - 1.0).abs() < 1e-6);
        assert!(l.y > 0.0);
    }

    #[test]
    fn rejects_non_finite_values() {
        let p = RippleParams {
            delta: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(ParamsError::NotFinite { name: "delta", .. })
        ));
    }

    #[test]
    fn rejects_bad_decay_and_radius() {
        let p = RippleParams {
            pressure_decay: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(ParamsError::OutOfRange {
                name: "pressure_decay",
                ..
            })
        ));

        let p = RippleParams {
            disturbance_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(ParamsError::NotPositive {
                name: "disturbance_radius",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_light() {
        let p = RippleParams::default().with_light_direction([0.0, 0.0, 0.0]);
        assert_eq!(p.validate(), Err(ParamsError::ZeroLightDirection));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let p: RippleParams =
            serde_json::from_str(r#"{ "delta": 1.0, "specular_exponent": 30.0 }"#).unwrap();
        assert_eq!(p.delta, 1.0);
        assert_eq!(p.specular_exponent, 30.0);
        assert_eq!(p.pressure_decay, DEFAULT_PRESSURE_DECAY);
        assert_eq!(p.light_direction, DEFAULT_LIGHT_DIRECTION);
    }
}
