/// Page wiring and canvas sizing constants.
// Element ids looked up at start-up
pub const CANVAS_ID: &str = "ripple-canvas";
pub const BACKGROUND_IMAGE_ID: &str = "ripple-background";

// Checkerboard fallback cell size, in backing pixels
pub const CHECKER_CELL_PX: u32 = 32;

// Upper bound for either canvas backing dimension. Stays below the default
// WebGPU max texture size so the state targets can always be allocated.
pub const MAX_BACKING_PX: u32 = 4096;

// Upper bound on devicePixelRatio used for backing size
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;
