//! Pure-Rust raster surface.
//!
//! Paints strokes as signed-distance rings with a gaussian falloff standing in
//! for Canvas2D's `shadowBlur`. It has no font, so [`DrawSurface::fill_text`]
//! reports [`PaintError::TextUnsupported`]. Output is PNG in a `data:` URL.

use base64::Engine as _;
use glam::Vec2;

use crate::assets::color::Rgba;
use crate::assets::paint::{DrawSurface, PaintError, Stroke, SurfaceProvider, TextStyle};
use crate::assets::textures::Texture;

/// Peak opacity of the glow relative to the stroke colour's alpha.
const GLOW_STRENGTH: f32 = 0.75;

/// Square RGBA8 pixel buffer (straight alpha, row-major).
#[derive(Debug, Clone)]
pub struct RasterSurface {
    size: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            pixels: vec![0; size as usize * size as usize * 4],
        }
    }

    /// The colour at pixel (x, y). Out-of-bounds reads are transparent.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        if x >= self.size || y >= self.size {
            return Rgba::TRANSPARENT;
        }
        let i = (y as usize * self.size as usize + x as usize) * 4;
        Rgba {
            r: self.pixels[i],
            g: self.pixels[i + 1],
            b: self.pixels[i + 2],
            a: self.pixels[i + 3],
        }
    }

    /// Composite `color` with coverage `alpha` over the pixel at index `i` (src-over).
    fn blend(&mut self, i: usize, color: Rgba, alpha: f32) {
        let src_a = alpha.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst_a = self.pixels[i + 3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |src: u8, dst: u8| -> u8 {
            let v = (src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        self.pixels[i] = mix(color.r, self.pixels[i]);
        self.pixels[i + 1] = mix(color.g, self.pixels[i + 1]);
        self.pixels[i + 2] = mix(color.b, self.pixels[i + 2]);
        self.pixels[i + 3] = (out_a * 255.0).round() as u8;
    }

    fn encode_png(&self) -> Result<Vec<u8>, PaintError> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, self.size, self.size);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|err| PaintError::Encode(err.to_string()))?;
            writer
                .write_image_data(&self.pixels)
                .map_err(|err| PaintError::Encode(err.to_string()))?;
            writer
                .finish()
                .map_err(|err| PaintError::Encode(err.to_string()))?;
        }
        Ok(bytes)
    }

    /// Encode into a PNG texture without consuming the surface.
    pub fn to_texture(&self) -> Result<Texture, PaintError> {
        let png = self.encode_png()?;
        Ok(Texture {
            width: self.size,
            height: self.size,
            data_url: format!(
                "data:image/png;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(png)
            ),
        })
    }
}

impl DrawSurface for RasterSurface {
    fn size(&self) -> u32 {
        self.size
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) -> Result<(), PaintError> {
        let half_width = stroke.width * 0.5;
        // Canvas2D treats shadowBlur as twice the gaussian sigma.
        let sigma = stroke.glow * 0.5;
        let base_alpha = stroke.color.a as f32 / 255.0;

        for y in 0..self.size {
            for x in 0..self.size {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let dist = ((p - center).length() - radius).abs();

                let glow = if sigma > 0.0 {
                    let outside = (dist - half_width).max(0.0);
                    GLOW_STRENGTH * (-(outside * outside) / (2.0 * sigma * sigma)).exp()
                } else {
                    0.0
                };
                let coverage = (half_width - dist + 0.5).clamp(0.0, 1.0);
                let alpha = (coverage + glow * (1.0 - coverage)) * base_alpha;

                let i = (y as usize * self.size as usize + x as usize) * 4;
                self.blend(i, stroke.color, alpha);
            }
        }
        Ok(())
    }

    fn fill_text(&mut self, _text: &str, _anchor: Vec2, _style: &TextStyle) -> Result<(), PaintError> {
        Err(PaintError::TextUnsupported)
    }

    fn finish(self: Box<Self>) -> Result<Texture, PaintError> {
        self.to_texture()
    }
}

/// Hands out [`RasterSurface`]s. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterProvider;

impl SurfaceProvider for RasterProvider {
    fn create_surface(&mut self, size: u32) -> Result<Box<dyn DrawSurface>, PaintError> {
        Ok(Box::new(RasterSurface::new(size)))
    }
}
