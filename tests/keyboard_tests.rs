// Host-side tests for pure keyboard functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod keyboard {
    include!("../src/events/keyboard.rs");
}

use keyboard::*;

#[test]
fn reset_keys_map_case_insensitively() {
    assert_eq!(key_action("r"), Some(KeyAction::Reset));
    assert_eq!(key_action("R"), Some(KeyAction::Reset));
}

#[test]
fn space_toggles_pause() {
    assert_eq!(key_action(" "), Some(KeyAction::TogglePause));
}

#[test]
fn unmapped_keys_are_ignored() {
    for key in ["a", "Enter", "Escape", "ArrowUp", "1", ""] {
        assert_eq!(key_action(key), None, "key {:?}", key);
    }
}

#[test]
fn pause_toggles_back_and_forth() {
    let mut c = Controls::default();
    c.apply(KeyAction::TogglePause);
    assert!(c.paused);
    c.apply(KeyAction::TogglePause);
    assert!(!c.paused);
}

#[test]
fn reset_is_consumed_once() {
    let mut c = Controls::default();
    c.apply(KeyAction::Reset);
    assert!(c.take_reset());
    assert!(!c.take_reset());
    assert!(!c.paused);
}
