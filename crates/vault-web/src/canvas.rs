use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use vault_engine::{DrawSurface, PaintError, Stroke, SurfaceProvider, TextStyle, Texture};

fn js_err(e: JsValue) -> PaintError {
    PaintError::Draw(format!("{:?}", e))
}

/// Hands out detached `<canvas>` elements as sprite surfaces.
pub struct CanvasSurfaceProvider {
    document: Document,
}

impl CanvasSurfaceProvider {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl SurfaceProvider for CanvasSurfaceProvider {
    fn create_surface(&mut self, size: u32) -> Result<Box<dyn DrawSurface>, PaintError> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|e| PaintError::SurfaceUnavailable(format!("{:?}", e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PaintError::SurfaceUnavailable("element is not a canvas".into()))?;
        canvas.set_width(size);
        canvas.set_height(size);

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| PaintError::SurfaceUnavailable(format!("{:?}", e)))?
            .ok_or_else(|| PaintError::SurfaceUnavailable("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PaintError::SurfaceUnavailable("unexpected context type".into()))?;

        Ok(Box::new(CanvasSurface { canvas, ctx, size }))
    }
}

/// An offscreen canvas. Glow uses the context's shadow blur.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: u32,
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> u32 {
        self.size
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) -> Result<(), PaintError> {
        let color = JsValue::from_str(&stroke.color.to_css());
        self.ctx.save();
        self.ctx.set_shadow_blur(stroke.glow as f64);
        self.ctx.set_shadow_color(&stroke.color.to_css());
        self.ctx.set_stroke_style(&color);
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.begin_path();
        let drawn = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, std::f64::consts::TAU);
        if drawn.is_ok() {
            self.ctx.stroke();
        }
        self.ctx.restore();
        drawn.map_err(js_err)
    }

    fn fill_text(&mut self, text: &str, anchor: Vec2, style: &TextStyle) -> Result<(), PaintError> {
        self.ctx.save();
        self.ctx.set_shadow_blur(0.0);
        self.ctx.set_fill_style(&JsValue::from_str(&style.color.to_css()));
        self.ctx.set_font(&style.css_font());
        self.ctx.set_text_align("center");
        let drawn = self.ctx.fill_text(text, anchor.x as f64, anchor.y as f64);
        self.ctx.restore();
        drawn.map_err(js_err)
    }

    fn finish(self: Box<Self>) -> Result<Texture, PaintError> {
        let data_url = self
            .canvas
            .to_data_url()
            .map_err(|e| PaintError::Encode(format!("{:?}", e)))?;
        Ok(Texture {
            width: self.size,
            height: self.size,
            data_url,
        })
    }
}
