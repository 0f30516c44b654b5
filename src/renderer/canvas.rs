//! Canvas 2D surface for the particle layer

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{GlossyCircle, Surface};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// None when the canvas has no 2D context
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self::new(ctx))
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_glossy_circle(&mut self, circle: &GlossyCircle) {
        let gradient = match self.ctx.create_radial_gradient(
            circle.highlight.x as f64,
            circle.highlight.y as f64,
            circle.highlight_radius as f64,
            circle.center.x as f64,
            circle.center.y as f64,
            circle.radius as f64,
        ) {
            Ok(gradient) => gradient,
            Err(e) => {
                log::debug!("skipping bubble: {:?}", e);
                return;
            }
        };
        for stop in &circle.stops {
            let _ = gradient.add_color_stop(stop.offset, &stop.css());
        }

        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            circle.center.x as f64,
            circle.center.y as f64,
            circle.radius as f64,
            0.0,
            TAU,
        );
        self.ctx.fill();
    }
}
