//! State field storage and the two-buffer ping-pong arena.
//!
//! A `StateField` is the CPU image of the simulation texture: one
//! `CellState` (four `f32` channels) per texel, row-major, `y = 0` first.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("expected {expected} samples for the field, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("field sizes differ: {a_width}x{a_height} vs {b_width}x{b_height}")]
    SizeMismatch {
        a_width: u32,
        a_height: u32,
        b_width: u32,
        b_height: u32,
    },
}

/// One texel of the simulation state.
///
/// Channel order matches the texture layout: `x` pressure, `y` pressure
/// velocity, `z` horizontal gradient, `w` vertical gradient.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CellState {
    pub pressure: f32,
    pub velocity: f32,
    pub grad_x: f32,
    pub grad_y: f32,
}

impl CellState {
    pub const ZERO: Self = Self {
        pressure: 0.0,
        velocity: 0.0,
        grad_x: 0.0,
        grad_y: 0.0,
    };

    #[inline]
    pub fn new(pressure: f32, velocity: f32, grad_x: f32, grad_y: f32) -> Self {
        Self {
            pressure,
            velocity,
            grad_x,
            grad_y,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.pressure, self.velocity, self.grad_x, self.grad_y]
    }

    #[inline]
    pub fn gradient(self) -> glam::Vec2 {
        glam::Vec2::new(self.grad_x, self.grad_y)
    }
}

/// A 2D grid of `CellState` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct StateField {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
}

impl StateField {
    /// Allocate an all-zero field.
    pub fn new(width: u32, height: u32) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::ZeroSize { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![CellState::ZERO; width as usize * height as usize],
        })
    }

    /// Wrap existing samples (row-major).
    pub fn from_cells(width: u32, height: u32, cells: Vec<CellState>) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::ZeroSize { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(FieldError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
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
    pub fn resolution(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    fn idx(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<CellState> {
        (x < self.width && y < self.height).then(|| self.cells[self.idx(x, y)])
    }

    pub fn set(&mut self, x: u32, y: u32, cell: CellState) {
        if x < self.width && y < self.height {
            let idx = self.idx(x, y);
            self.cells[idx] = cell;
        }
    }

    /// Fetch with clamp-to-edge addressing, the way a texture sampler with
    /// `ClampToEdge` resolves out-of-range texel lookups.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> CellState {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.cells[self.idx(cx, cy)]
    }

    #[inline]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [CellState] {
        &mut self.cells
    }

    /// Raw bytes, ready for an `Rgba32Float` texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    pub fn fill(&mut self, cell: CellState) {
        self.cells.fill(cell);
    }

    pub fn clear(&mut self) {
        self.fill(CellState::ZERO);
    }

    /// Sum of squared pressure over all cells.
    pub fn total_energy(&self) -> f32 {
        self.cells.iter().map(|c| c.pressure * c.pressure).sum()
    }

    /// Largest absolute pressure.
    pub fn max_pressure(&self) -> f32 {
        self.cells
            .iter()
            .map(|c| c.pressure.abs())
            .fold(0.0, f32::max)
    }

    pub fn same_size(&self, other: &StateField) -> Result<(), FieldError> {
        if self.width == other.width && self.height == other.height {
            Ok(())
        } else {
            Err(FieldError::SizeMismatch {
                a_width: self.width,
                a_height: self.height,
                b_width: other.width,
                b_height: other.height,
            })
        }
    }
}

/// An arena of two buffers with a read-index flag.
///
/// Each frame reads from one buffer and writes the other; `swap` flips the
/// roles. Neither buffer is ever read and written within the same frame.
#[derive(Debug, Clone)]
pub struct PingPong<T> {
    buffers: [T; 2],
    read: usize,
}

impl<T> PingPong<T> {
    pub fn new(a: T, b: T) -> Self {
        Self {
            buffers: [a, b],
            read: 0,
        }
    }

    /// Index of the buffer currently bound for reading (0 or 1).
    #[inline]
    pub fn read_index(&self) -> usize {
        self.read
    }

    #[inline]
    pub fn read(&self) -> &T {
        &self.buffers[self.read]
    }

    #[inline]
    pub fn write(&self) -> &T {
        &self.buffers[1 - self.read]
    }

    #[inline]
    pub fn write_mut(&mut self) -> &mut T {
        &mut self.buffers[1 - self.read]
    }

    /// Shared access to the read buffer alongside exclusive access to the
    /// write buffer.
    pub fn split(&mut self) -> (&T, &mut T) {
        let [a, b] = &mut self.buffers;
        if self.read == 0 {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Make the last written buffer the next read buffer.
    #[inline]
    pub fn swap(&mut self) {
        self.read = 1 - self.read;
    }

    pub fn both_mut(&mut self) -> [&mut T; 2] {
        let [a, b] = &mut self.buffers;
        [a, b]
    }
}

impl<T: Clone> PingPong<T> {
    /// Both buffers start as copies of `value`.
    pub fn splat(value: T) -> Self {
        Self::new(value.clone(), value)
    }
}
