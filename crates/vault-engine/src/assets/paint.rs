//! Drawing-surface abstraction used to generate sprite textures.
//!
//! A [`SurfaceProvider`] hands out square offscreen surfaces; a
//! [`DrawSurface`] accepts a handful of primitives and encodes itself into a
//! [`Texture`]. The browser bridge backs this with `<canvas>`; the engine
//! ships a pure-Rust raster fallback in [`crate::assets::raster`].

use glam::Vec2;
use thiserror::Error;

use crate::assets::color::Rgba;
use crate::assets::textures::Texture;

#[derive(Debug, Error)]
pub enum PaintError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("surface cannot render text")]
    TextUnsupported,
    #[error("failed to draw: {0}")]
    Draw(String),
    #[error("failed to encode texture: {0}")]
    Encode(String),
}

/// A stroked outline with an optional soft glow around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    /// Blur radius of the glow in pixels (0 disables it).
    pub glow: f32,
}

/// Centered single-line text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    /// Font size in pixels.
    pub size: f32,
    pub bold: bool,
    pub family: String,
}

impl TextStyle {
    /// CSS `font` shorthand, e.g. `bold 11px sans-serif`.
    pub fn css_font(&self) -> String {
        let weight = if self.bold { "bold " } else { "" };
        format!("{}{}px {}", weight, self.size, self.family)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            size: 11.0,
            bold: true,
            family: "sans-serif".to_string(),
        }
    }
}

/// A square offscreen drawing surface.
pub trait DrawSurface {
    /// Edge length in pixels.
    fn size(&self) -> u32;

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) -> Result<(), PaintError>;

    /// Draw `text` horizontally centered on `anchor.x` with its baseline at `anchor.y`.
    fn fill_text(&mut self, text: &str, anchor: Vec2, style: &TextStyle) -> Result<(), PaintError>;

    /// Encode the surface into a texture, releasing the surface.
    fn finish(self: Box<Self>) -> Result<Texture, PaintError>;
}

/// Source of drawing surfaces.
pub trait SurfaceProvider {
    fn create_surface(&mut self, size: u32) -> Result<Box<dyn DrawSurface>, PaintError>;
}
