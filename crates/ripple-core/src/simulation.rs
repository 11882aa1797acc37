//! CPU reference implementation of the simulation kernel.
//!
//! Every cell is evaluated exactly as the fragment program evaluates its
//! pixel: texel-centre UVs, clamp-to-edge neighbour fetches, the mirror
//! boundary rule, then the damped wave update. Rows are independent, so a
//! frame is evaluated row-parallel with rayon.

use crate::disturbance::{self, Disturbance};
use crate::params::RippleParams;
use crate::state::{CellState, FieldError, PingPong, StateField};
use glam::Vec2;
use rayon::prelude::*;

/// Grids with at least this many cells are stepped in parallel.
const PARALLEL_THRESHOLD: usize = 256 * 256;

/// Per-frame inputs supplied by the embedding loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInputs {
    /// Frame index; frame 0 forces a cold start.
    pub frame: u32,
    /// Elapsed seconds. Carried for hosts and shaders; the physics ignores it.
    pub time: f32,
    pub disturbance: Option<Disturbance>,
}

/// Neighbour pressures of one cell after the mirror boundary rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbors {
    pub left: f32,
    pub right: f32,
    pub up: f32,
    pub down: f32,
}

/// UV of the centre of texel `(x, y)`.
#[inline]
pub fn texel_center_uv(x: u32, y: u32, resolution: Vec2) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / resolution.x,
        (y as f32 + 0.5) / resolution.y,
    )
}

/// Neighbour pressures of `(x, y)` with the mirror boundary applied.
///
/// At an edge the missing neighbour takes the value of the opposite
/// interior neighbour, checked left, right, down, up in that order.
pub fn neighbors(field: &StateField, x: u32, y: u32) -> Neighbors {
    let resolution = field.resolution();
    let texel = Vec2::ONE / resolution;
    let uv = texel_center_uv(x, y, resolution);
    let (xi, yi) = (x as i64, y as i64);

    let mut n = Neighbors {
        right: field.get_clamped(xi + 1, yi).pressure,
        left: field.get_clamped(xi - 1, yi).pressure,
        up: field.get_clamped(xi, yi + 1).pressure,
        down: field.get_clamped(xi, yi - 1).pressure,
    };

    if uv.x <= texel.x {
        n.left = n.right;
    }
    if uv.x >= 1.0 - texel.x {
        n.right = n.left;
    }
    if uv.y <= texel.y {
        n.down = n.up;
    }
    if uv.y >= 1.0 - texel.y {
        n.up = n.down;
    }
    n
}

/// Evaluate the simulation kernel for one cell of `read`.
pub fn simulate_cell(
    read: &StateField,
    x: u32,
    y: u32,
    inputs: &FrameInputs,
    params: &RippleParams,
) -> CellState {
    if inputs.frame == 0 {
        return CellState::ZERO;
    }

    let resolution = read.resolution();
    let uv = texel_center_uv(x, y, resolution);
    let here = read.get_clamped(x as i64, y as i64);
    let mut pressure = here.pressure;
    let mut p_vel = here.velocity;
    let n = neighbors(read, x, y);
    let delta = params.delta;

    p_vel += delta * (-2.0 * pressure + n.right + n.left) / 4.0;
    p_vel += delta * (-2.0 * pressure + n.up + n.down) / 4.0;

    pressure += delta * p_vel;

    p_vel -= params.restoring_force * delta * pressure;
    p_vel *= 1.0 - params.velocity_damping * delta;
    pressure *= params.pressure_decay;

    if let Some(d) = inputs.disturbance {
        let dist = uv.distance(d.uv(resolution));
        if dist <= params.disturbance_radius {
            pressure += disturbance::impulse(dist, params);
        }
    }

    CellState::new(
        pressure,
        p_vel,
        (n.right - n.left) * 0.5,
        (n.up - n.down) * 0.5,
    )
}

/// Evaluate every cell of `read` into `write`.
///
/// `write` is only written, never read, so its previous contents do not
/// matter.
pub fn step_field(
    read: &StateField,
    write: &mut StateField,
    inputs: &FrameInputs,
    params: &RippleParams,
) -> Result<(), FieldError> {
    read.same_size(write)?;

    if inputs.frame == 0 {
        write.clear();
        return Ok(());
    }

    let width = read.width() as usize;
    let eval_row = |(y, row): (usize, &mut [CellState])| {
        for (x, out) in row.iter_mut().enumerate() {
            *out = simulate_cell(read, x as u32, y as u32, inputs, params);
        }
    };

    if read.cell_count() >= PARALLEL_THRESHOLD {
        write
            .cells_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(eval_row);
    } else {
        write.cells_mut().chunks_mut(width).enumerate().for_each(eval_row);
    }
    Ok(())
}

/// Owns the double-buffered state field and the frame counter.
pub struct RippleSimulation {
    fields: PingPong<StateField>,
    frame: u32,
    params: RippleParams,
}

impl RippleSimulation {
    pub fn new(width: u32, height: u32, params: RippleParams) -> Result<Self, FieldError> {
        let field = StateField::new(width, height)?;
        Ok(Self {
            fields: PingPong::splat(field),
            frame: 0,
            params,
        })
    }

    /// Advance one frame: evaluate the read field into the write field, then
    /// swap so the result becomes the next read field.
    pub fn step(&mut self, disturbance: Option<Disturbance>, time: f32) {
        let inputs = FrameInputs {
            frame: self.frame,
            time,
            disturbance,
        };
        let (read, write) = self.fields.split();
        // both buffers are allocated together and resized together
        if let Err(e) = step_field(read, write, &inputs, &self.params) {
            log::error!("ripple step skipped: {}", e);
            return;
        }
        self.fields.swap();
        self.frame = self.frame.saturating_add(1);
    }

    /// Current state (the output of the last step).
    #[inline]
    pub fn state(&self) -> &StateField {
        self.fields.read()
    }

    /// Replace the current state, e.g. to restore a snapshot. The frame
    /// counter is left alone, so loading before frame 0 is still overridden
    /// by the cold start.
    pub fn load_state(&mut self, field: StateField) -> Result<(), FieldError> {
        self.fields.read().same_size(&field)?;
        let idx = self.fields.read_index();
        *self.fields.both_mut()[idx] = field;
        Ok(())
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.state().width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.state().height()
    }

    /// The next step becomes a cold start.
    pub fn reset(&mut self) {
        log::debug!("ripple simulation reset at frame {}", self.frame);
        self.frame = 0;
    }

    /// Reallocate both buffers at a new size and cold-start.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), FieldError> {
        let field = StateField::new(width, height)?;
        log::debug!("ripple simulation resized to {}x{}", width, height);
        self.fields = PingPong::splat(field);
        self.frame = 0;
        Ok(())
    }

    #[inline]
    pub fn params(&self) -> &RippleParams {
        &self.params
    }

    pub fn set_params(&mut self, params: RippleParams) {
        self.params = params;
    }

    pub fn total_energy(&self) -> f32 {
        self.state().total_energy()
    }

    pub fn max_pressure(&self) -> f32 {
        self.state().max_pressure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(width: u32, height: u32) -> StateField {
        let cells = (0..width * height)
            .map(|i| CellState::new(((i * 7 + 3) % 11) as f32 * 0.1, 0.05, 0.0, 0.0))
            .collect();
        StateField::from_cells(width, height, cells).unwrap()
    }

    #[test]
    fn frame_zero_clears_write_buffer() {
        let read = seeded(4, 4);
        let mut write = seeded(4, 4);
        let inputs = FrameInputs {
            frame: 0,
            time: 3.0,
            disturbance: Some(Disturbance::at(2.0, 2.0)),
        };
        step_field(&read, &mut write, &inputs, &RippleParams::default()).unwrap();
        assert!(write.cells().iter().all(|c| *c == CellState::ZERO));
    }

    #[test]
    fn interior_cell_matches_hand_computation() {
        let mut field = StateField::new(5, 5).unwrap();
        field.set(2, 2, CellState::new(1.0, 0.0, 0.0, 0.0));
        let inputs = FrameInputs {
            frame: 1,
            ..Default::default()
        };
        let p = RippleParams::default();
        let out = simulate_cell(&field, 2, 2, &inputs, &p);

        let mut v = 1.4 * (-2.0 * 1.0 + 0.0 + 0.0) / 4.0;
        v += 1.4 * (-2.0 * 1.0 + 0.0 + 0.0) / 4.0;
        let mut pr = 1.0 + 1.4 * v;
        v -= 0.005 * 1.4 * pr;
        v *= 1.0 - 0.002 * 1.4;
        pr *= 0.999;
        assert_eq!(out.pressure, pr);
        assert_eq!(out.velocity, v);
        assert_eq!(out.grad_x, 0.0);
        assert_eq!(out.grad_y, 0.0);
    }

    #[test]
    fn neighbour_of_impulse_sees_gradient() {
        let mut field = StateField::new(5, 5).unwrap();
        field.set(2, 2, CellState::new(1.0, 0.0, 0.0, 0.0));
        let inputs = FrameInputs {
            frame: 1,
            ..Default::default()
        };
        let out = simulate_cell(&field, 1, 2, &inputs, &RippleParams::default());
        assert_eq!(out.grad_x, 0.5);
        assert!(out.velocity > 0.0);
    }

    #[test]
    fn mirror_applies_on_every_edge() {
        let field = seeded(4, 3);
        let left = neighbors(&field, 0, 1);
        assert_eq!(left.left, left.right);
        let right = neighbors(&field, 3, 1);
        assert_eq!(right.right, right.left);
        let bottom = neighbors(&field, 1, 0);
        assert_eq!(bottom.down, bottom.up);
        let top = neighbors(&field, 1, 2);
        assert_eq!(top.up, top.down);
    }

    #[test]
    fn disturbance_only_touches_cells_in_radius() {
        let field = StateField::new(100, 100).unwrap();
        let inputs = FrameInputs {
            frame: 1,
            time: 0.0,
            disturbance: Some(Disturbance::at(50.5, 50.5)),
        };
        let p = RippleParams::default();
        let centre = simulate_cell(&field, 50, 50, &inputs, &p);
        assert_eq!(centre.pressure, 2.0);
        let far = simulate_cell(&field, 60, 50, &inputs, &p);
        assert_eq!(far.pressure, 0.0);
    }

    #[test]
    fn step_swaps_and_counts_frames() {
        let mut sim = RippleSimulation::new(8, 8, RippleParams::default()).unwrap();
        sim.step(None, 0.0);
        assert_eq!(sim.frame(), 1);
        sim.step(Some(Disturbance::at(4.5, 4.5)), 0.016);
        assert_eq!(sim.frame(), 2);
        assert!(sim.max_pressure() > 0.0);

        sim.reset();
        assert_eq!(sim.frame(), 0);
        sim.step(Some(Disturbance::at(4.5, 4.5)), 0.032);
        assert_eq!(sim.total_energy(), 0.0);
    }

    #[test]
    fn resize_reallocates_and_cold_starts() {
        let mut sim = RippleSimulation::new(8, 8, RippleParams::default()).unwrap();
        sim.step(None, 0.0);
        sim.resize(16, 4).unwrap();
        assert_eq!((sim.width(), sim.height()), (16, 4));
        assert_eq!(sim.frame(), 0);
        assert!(sim.resize(0, 4).is_err());
    }

    #[test]
    fn load_state_checks_size() {
        let mut sim = RippleSimulation::new(4, 4, RippleParams::default()).unwrap();
        assert!(sim.load_state(seeded(4, 4)).is_ok());
        assert_eq!(sim.state(), &seeded(4, 4));
        assert!(sim.load_state(seeded(3, 4)).is_err());
    }

    #[test]
    fn parallel_and_sequential_paths_agree() {
        let width = 260;
        let height = 256;
        let cells = (0..width * height)
            .map(|i| CellState::new(((i * 31 + 7) % 97) as f32 / 97.0 - 0.5, 0.0, 0.0, 0.0))
            .collect();
        let read = StateField::from_cells(width, height, cells).unwrap();
        let mut write = StateField::new(width, height).unwrap();
        let inputs = FrameInputs {
            frame: 5,
            time: 0.0,
            disturbance: Some(Disturbance::at(130.0, 128.0)),
        };
        let p = RippleParams::default();
        step_field(&read, &mut write, &inputs, &p).unwrap();

        for &(x, y) in &[(0, 0), (259, 255), (130, 128), (17, 200)] {
            assert_eq!(
                write.get(x, y).unwrap(),
                simulate_cell(&read, x, y, &inputs, &p)
            );
        }
    }
}
