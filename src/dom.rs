use crate::background::{self, ImageLoad};
use crate::constants::{MAX_BACKING_PX, MAX_DEVICE_PIXEL_RATIO};
use crate::input;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    let el = document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?;
    el.dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{} is not a canvas: {:?}", id, e))
}

/// Optional `<img>` element; `None` when absent or not an image.
pub fn image_by_id(document: &web::Document, id: &str) -> Option<web::HtmlImageElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlImageElement>().ok())
}

#[inline]
pub fn image_load_state(img: &web::HtmlImageElement) -> ImageLoad {
    background::image_load_state(img.complete(), img.natural_width(), img.natural_height())
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let rect = canvas.get_bounding_client_rect();
        let (w_px, h_px) = input::backing_size(
            rect.width(),
            rect.height(),
            w.device_pixel_ratio(),
            MAX_DEVICE_PIXEL_RATIO,
            MAX_BACKING_PX,
        );
        if canvas.width() != w_px || canvas.height() != h_px {
            canvas.set_width(w_px);
            canvas.set_height(h_px);
        }
    }
}
