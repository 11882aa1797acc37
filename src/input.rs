use glam::Vec2;
use ripple_core::Disturbance;
use web_sys as web;

/// Latest pointer position in canvas backing pixels, and whether the
/// pointer is currently over the canvas.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub inside: bool,
}

impl MouseState {
    pub fn move_to(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
        self.inside = true;
    }

    pub fn leave(&mut self) {
        self.inside = false;
    }

    /// Disturbance for this frame: present while the pointer is inside,
    /// including on the canvas's left and top edges.
    pub fn disturbance(&self) -> Option<Disturbance> {
        self.inside.then(|| Disturbance::at(self.x, self.y))
    }
}

/// Map a CSS-pixel offset inside an element of `rect_w` x `rect_h` CSS
/// pixels to the canvas backing store of `backing_w` x `backing_h`.
#[inline]
pub fn css_to_backing_px(
    x_css: f32,
    y_css: f32,
    rect_w: f32,
    rect_h: f32,
    backing_w: u32,
    backing_h: u32,
) -> Vec2 {
    if rect_w <= 0.0 || rect_h <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (x_css / rect_w) * backing_w as f32,
        (y_css / rect_h) * backing_h as f32,
    )
}

#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    css_to_backing_px(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
        canvas.width(),
        canvas.height(),
    )
}

/// Canvas backing size for a CSS box of `css_w` x `css_h` at `dpr`.
#[inline]
pub fn backing_size(css_w: f64, css_h: f64, dpr: f64, max_dpr: f64, max_px: u32) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 {
        dpr.min(max_dpr)
    } else {
        1.0
    };
    let w = ((css_w * dpr) as u32).clamp(1, max_px);
    let h = ((css_h * dpr) as u32).clamp(1, max_px);
    (w, h)
}
