//! Neon bubble sprites: a glowing ring in the item's colour with its name
//! centered in white.

use glam::Vec2;
use vault_engine::{
    DrawSurface, PaintError, RasterSurface, Rgba, Stroke, SurfaceProvider, TextStyle, Texture,
};

use crate::config::BowlConfig;

/// Baseline offset below the sprite center, so bold caps sit visually centered.
const LABEL_BASELINE_OFFSET: f32 = 4.0;

/// Paint one bubble sprite.
///
/// When `surfaces` cannot produce a labeled sprite the bubble falls back to
/// an unlabeled ring rasterized in Rust. Only a failure of that fallback is
/// returned as an error.
pub fn paint_bubble(
    surfaces: &mut dyn SurfaceProvider,
    label: &str,
    color: &str,
    config: &BowlConfig,
) -> Result<Texture, PaintError> {
    let color = Rgba::parse_or_white(color);
    match paint_labeled(surfaces, label, color, config) {
        Ok(texture) => Ok(texture),
        Err(e) => {
            log::warn!("Bubble {:?} painted without label: {}", label, e);
            let surface: Box<dyn DrawSurface> = Box::new(RasterSurface::new(config.sprite_size));
            paint_ring(surface, color, config)?.finish()
        }
    }
}

fn paint_labeled(
    surfaces: &mut dyn SurfaceProvider,
    label: &str,
    color: Rgba,
    config: &BowlConfig,
) -> Result<Texture, PaintError> {
    let surface = surfaces.create_surface(config.sprite_size)?;
    let mut surface = paint_ring(surface, color, config)?;
    let center = sprite_center(config);
    let style = TextStyle {
        size: config.font_px,
        ..TextStyle::default()
    };
    surface.fill_text(label, center + Vec2::new(0.0, LABEL_BASELINE_OFFSET), &style)?;
    surface.finish()
}

fn paint_ring(
    mut surface: Box<dyn DrawSurface>,
    color: Rgba,
    config: &BowlConfig,
) -> Result<Box<dyn DrawSurface>, PaintError> {
    let stroke = Stroke {
        color,
        width: config.stroke_width,
        glow: config.glow_blur,
    };
    surface.stroke_circle(sprite_center(config), config.visual_radius, &stroke)?;
    Ok(surface)
}

fn sprite_center(config: &BowlConfig) -> Vec2 {
    Vec2::splat(config.sprite_size as f32 / 2.0)
}
