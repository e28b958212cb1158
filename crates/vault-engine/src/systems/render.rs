use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, SpriteInstance};

/// Build the render buffer from a set of entities.
/// Invisible entities (inactive, or without a sprite) are skipped; the rest
/// keep their spawn order.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in entities {
        if !entity.active {
            continue;
        }

        let texture = match entity.sprite {
            Some(t) => t,
            None => continue,
        };

        buffer.push(SpriteInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            rotation: entity.rotation,
            size: entity.size,
            texture,
        });
    }
}
