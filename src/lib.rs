#![cfg(target_arch = "wasm32")]
use instant::Instant;
use ripple_core::RippleParams;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod background;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod render;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ripple-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, constants::CANVAS_ID)?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let params = RippleParams::default();
    let gpu = frame::init_gpu(&canvas, params).await;
    let pending_background = dom::image_by_id(&document, constants::BACKGROUND_IMAGE_ID);
    if pending_background.is_none() {
        log::info!(
            "no #{} image; using checkerboard",
            constants::BACKGROUND_IMAGE_ID
        );
    }

    let mouse_state = Rc::new(RefCell::new(input::MouseState::default()));
    let controls = Rc::new(RefCell::new(events::Controls::default()));

    events::wire_global_keydown(controls.clone());
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        mouse_state: mouse_state.clone(),
    });

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        gpu,
        canvas,
        mouse: mouse_state,
        controls,
        pending_background,
        start: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
