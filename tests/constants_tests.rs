// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn element_ids_are_distinct_and_non_empty() {
    assert!(!CANVAS_ID.is_empty());
    assert!(!BACKGROUND_IMAGE_ID.is_empty());
    assert_ne!(CANVAS_ID, BACKGROUND_IMAGE_ID);
    assert!(!CANVAS_ID.starts_with('#'));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn canvas_limits_fit_default_gpu_limits() {
    // Default WebGPU maxTextureDimension2D is 8192
    assert!(MAX_BACKING_PX > 0 && MAX_BACKING_PX <= 8192);
    assert!(MAX_DEVICE_PIXEL_RATIO >= 1.0);
    assert!(CHECKER_CELL_PX > 0 && CHECKER_CELL_PX < MAX_BACKING_PX);
}
