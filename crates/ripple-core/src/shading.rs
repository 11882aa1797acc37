//! CPU reference implementation of the render/composite kernel, plus the
//! background image it samples.

use crate::params::RippleParams;
use crate::simulation::texel_center_uv;
use crate::state::{CellState, FieldError, StateField};
use glam::{Vec2, Vec3, Vec4};
use rayon::prelude::*;

/// Anything the composite kernel can sample as its background.
pub trait Background: Sync {
    /// Colour at `uv`; out-of-range coordinates are the implementor's
    /// addressing policy.
    fn sample(&self, uv: Vec2) -> Vec4;
}

impl Background for Vec4 {
    fn sample(&self, _uv: Vec2) -> Vec4 {
        *self
    }
}

/// An RGBA8 image sampled nearest-texel with clamp-to-edge addressing.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl BackgroundImage {
    pub fn from_rgba8(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::ZeroSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(FieldError::LengthMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Procedural two-tone checkerboard used when no image is supplied.
    pub fn checkerboard(width: u32, height: u32, cell_px: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let cell_px = cell_px.max(1);
        let light = [0x3c, 0x8d, 0xbc, 0xff];
        let dark = [0x1d, 0x4e, 0x74, 0xff];
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let on = ((x / cell_px) + (y / cell_px)) % 2 == 0;
                rgba.extend_from_slice(if on { &light } else { &dark });
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn as_rgba8(&self) -> &[u8] {
        &self.rgba
    }

    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        let i = (y.min(self.height - 1) as usize * self.width as usize
            + x.min(self.width - 1) as usize)
            * 4;
        let px = &self.rgba[i..i + 4];
        Vec4::new(px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32) / 255.0
    }
}

impl Background for BackgroundImage {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let fx = (uv.x * self.width as f32).floor();
        let fy = (uv.y * self.height as f32).floor();
        let x = fx.clamp(0.0, (self.width - 1) as f32) as u32;
        let y = fy.clamp(0.0, (self.height - 1) as f32) as u32;
        self.texel(x, y)
    }
}

/// UV offset for the refraction lookup.
#[inline]
pub fn distortion(state: CellState, params: &RippleParams) -> Vec2 {
    params.distortion_scale * state.gradient()
}

/// Normal of the height field implied by the gradient channels.
#[inline]
pub fn surface_normal(state: CellState, params: &RippleParams) -> Vec3 {
    Vec3::new(
        -state.grad_x * params.normal_slope,
        params.normal_height,
        -state.grad_y * params.normal_slope,
    )
    .normalize()
}

/// Phong-style highlight for `normal` under the configured light.
#[inline]
pub fn specular(normal: Vec3, params: &RippleParams) -> f32 {
    normal
        .dot(params.light_dir())
        .max(0.0)
        .powf(params.specular_exponent)
        * params.specular_intensity
}

/// Shade one pixel: refracted background plus a white highlight. Alpha is
/// the background's.
pub fn shade(state: CellState, uv: Vec2, background: &impl Background, params: &RippleParams) -> Vec4 {
    let color = background.sample(uv + distortion(state, params));
    let spec = specular(surface_normal(state, params), params);
    color + Vec4::new(spec, spec, spec, 0.0)
}

/// Shade a whole frame from `state` into `out` (row-major, one colour per
/// texel), row-parallel.
pub fn composite_field(
    state: &StateField,
    background: &impl Background,
    params: &RippleParams,
    out: &mut [Vec4],
) -> Result<(), FieldError> {
    if out.len() != state.cell_count() {
        return Err(FieldError::LengthMismatch {
            expected: state.cell_count(),
            actual: out.len(),
        });
    }
    let width = state.width() as usize;
    let resolution = state.resolution();
    out.par_chunks_mut(width)
        .zip(state.cells().par_chunks(width))
        .enumerate()
        .for_each(|(y, (row_out, row_in))| {
            for (x, (px, cell)) in row_out.iter_mut().zip(row_in).enumerate() {
                let uv = texel_center_uv(x as u32, y as u32, resolution);
                *px = shade(*cell, uv, background, params);
            }
        });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_surface_normal_points_up() {
        let n = surface_normal(CellState::ZERO, &RippleParams::default());
        assert_eq!(n, Vec3::Y);
    }

    #[test]
    fn flat_surface_has_small_default_highlight() {
        let p = RippleParams::default();
        let s = specular(Vec3::Y, &p);
        let expected = (10.0 / 118.0_f32.sqrt()).powf(60.0) * 1.5;
        assert!((s - expected).abs() < 1e-5, "{} vs {}", s, expected);
        assert!(s > 0.0 && s < 0.02);
    }

    #[test]
    fn highlight_is_strongest_facing_the_light() {
        let p = RippleParams::default();
        assert!((specular(p.light_dir(), &p) - 1.5).abs() < 1e-5);
        assert_eq!(specular(-p.light_dir(), &p), 0.0);
    }

    #[test]
    fn distortion_scales_gradient() {
        let d = distortion(CellState::new(9.0, 9.0, 1.0, -2.0), &RippleParams::default());
        assert!((d - Vec2::new(0.03, -0.06)).length() < 1e-7);
    }

    #[test]
    fn checkerboard_alternates() {
        let img = BackgroundImage::checkerboard(4, 4, 2);
        assert_eq!(img.as_rgba8().len(), 64);
        assert_ne!(img.texel(0, 0), img.texel(2, 0));
        assert_eq!(img.texel(0, 0), img.texel(2, 2));
    }

    #[test]
    fn image_sampling_clamps() {
        let img = BackgroundImage::from_rgba8(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        assert_eq!(img.sample(Vec2::new(-0.5, 0.5)), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(img.sample(Vec2::new(1.5, 0.5)), Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert!(BackgroundImage::from_rgba8(2, 2, vec![0; 4]).is_err());
    }

    #[test]
    fn alpha_passes_through() {
        let bg = Vec4::new(0.2, 0.3, 0.4, 0.5);
        let out = shade(
            CellState::new(0.0, 0.0, 0.3, 0.1),
            Vec2::splat(0.5),
            &bg,
            &RippleParams::default(),
        );
        assert_eq!(out.w, 0.5);
        assert!(out.x >= 0.2);
    }

    #[test]
    fn composite_checks_output_length() {
        let state = StateField::new(2, 2).unwrap();
        let mut out = vec![Vec4::ZERO; 3];
        assert!(composite_field(&state, &Vec4::ONE, &RippleParams::default(), &mut out).is_err());
    }
}
