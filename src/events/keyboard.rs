use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Reset,
    TogglePause,
}

#[inline]
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "r" | "R" => Some(KeyAction::Reset),
        " " => Some(KeyAction::TogglePause),
        _ => None,
    }
}

/// Flags the keyboard sets and the frame loop consumes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub paused: bool,
    pub reset_requested: bool,
}

impl Controls {
    pub fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Reset => self.reset_requested = true,
            KeyAction::TogglePause => self.paused = !self.paused,
        }
    }

    /// Returns whether a reset was pending, clearing it.
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_requested)
    }
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, controls: &Rc<RefCell<Controls>>) {
    let Some(action) = key_action(&ev.key()) else {
        return;
    };
    let mut c = controls.borrow_mut();
    c.apply(action);
    match action {
        KeyAction::Reset => log::info!("[keys] reset"),
        KeyAction::TogglePause => {
            log::info!("[keys] paused={}", c.paused);
            ev.prevent_default();
        }
    }
}

pub fn wire_global_keydown(controls: Rc<RefCell<Controls>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &controls);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
