use crate::input;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub mouse_state: Rc<RefCell<input::MouseState>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerleave(&w, "pointerleave");
    wire_pointerleave(&w, "pointercancel");
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        w.mouse_state.borrow_mut().move_to(pos);
    }) as Box<dyn FnMut(_)>);
    _ = target.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerleave(w: &InputWiring, event: &str) {
    let mouse_state = w.mouse_state.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        mouse_state.borrow_mut().leave();
    }) as Box<dyn FnMut(_)>);
    _ = w
        .canvas
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}
