use crate::background::ImageLoad;
use crate::dom;
use crate::events::Controls;
use crate::input;
use crate::render;
use instant::Instant;
use ripple_core::RippleParams;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub gpu: Option<render::GpuState>,
    pub canvas: web::HtmlCanvasElement,
    pub mouse: Rc<RefCell<input::MouseState>>,
    pub controls: Rc<RefCell<Controls>>,
    /// Background `<img>` still loading; uploaded once it completes.
    pub pending_background: Option<web::HtmlImageElement>,
    pub start: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        if let Some(img) = self.pending_background.take() {
            match dom::image_load_state(&img) {
                ImageLoad::Ready => gpu.set_background_image(&img),
                ImageLoad::Pending => self.pending_background = Some(img),
                ImageLoad::Failed => {
                    log::warn!("background image failed to load; keeping checkerboard")
                }
            }
        }

        gpu.resize_if_needed(self.canvas.width(), self.canvas.height());

        let (paused, reset) = {
            let mut c = self.controls.borrow_mut();
            (c.paused, c.take_reset())
        };
        if reset {
            gpu.reset();
        }

        let time = self.start.elapsed().as_secs_f32();
        let disturbance = self.mouse.borrow().disturbance();
        match gpu.render(time, disturbance, !paused) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost; reconfiguring");
                gpu.reconfigure();
            }
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    params: RippleParams,
) -> Option<render::GpuState> {
    match render::GpuState::new(canvas, params).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
