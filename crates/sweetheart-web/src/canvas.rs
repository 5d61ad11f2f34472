use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use sweetheart_engine::{GlyphDraw, Surface};

/// Canvas 2D implementation of the animator's drawing surface.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or("2d context not available")?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn try_draw(&self, draw: &GlyphDraw<'_>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(draw.translate.x as f64, draw.translate.y as f64)?;
        ctx.rotate(draw.rotation_rad as f64)?;
        ctx.set_global_alpha(draw.alpha as f64);

        let (start, end) = draw.gradient_line();
        let gradient = ctx.create_linear_gradient(
            start.x as f64,
            start.y as f64,
            end.x as f64,
            end.y as f64,
        );
        for stop in draw.gradient {
            gradient.add_color_stop(stop.offset, &stop.color)?;
        }
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.set_font(&format!("{}px Arial", draw.size));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let filled = ctx.fill_text(draw.glyph, 0.0, 0.0);
        ctx.restore();
        filled
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            log::debug!("canvas resized to {}x{}", width, height);
        }
    }

    fn clear(&mut self) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn draw_glyph(&mut self, draw: &GlyphDraw<'_>) {
        if let Err(err) = self.try_draw(draw) {
            log::warn!("glyph draw failed: {:?}", err);
        }
    }
}
