use glam::Vec2;
use vault_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, Rng,
    SurfaceProvider,
};

use crate::bowl::BUBBLE_FILTER;
use crate::bubble::paint_bubble;
use crate::catalog::SkillItem;
use crate::config::BowlConfig;

pub const BUBBLE_TAG: &str = "bubble";

/// Spawn position of the `index`-th bubble: container center plus jitter,
/// stacked upward above the visible area.
pub fn spawn_position(index: usize, width: f32, config: &BowlConfig, rng: &mut Rng) -> Vec2 {
    let jitter = rng.range(-config.spawn_jitter, config.spawn_jitter);
    Vec2::new(
        width / 2.0 + jitter,
        -config.spawn_offset - index as f32 * config.spawn_spacing,
    )
}

/// Create one dynamic bubble per item, in order, each with its own sprite.
pub fn spawn_bubbles<'a>(
    ctx: &mut EngineContext,
    surfaces: &mut dyn SurfaceProvider,
    items: impl Iterator<Item = &'a SkillItem>,
    width: f32,
    config: &BowlConfig,
    rng: &mut Rng,
) -> Vec<EntityId> {
    let material = ColliderMaterial {
        restitution: config.restitution,
        friction: config.friction,
        ..ColliderMaterial::default()
    };

    let mut ids = Vec::new();
    for (index, item) in items.enumerate() {
        let id = ctx.next_id();
        let mut entity = Entity::new(id)
            .with_tag(BUBBLE_TAG)
            .with_size(config.sprite_size as f32);
        match paint_bubble(surfaces, &item.name, &item.color, config) {
            Ok(texture) => {
                let texture = ctx.textures.insert(item.name.clone(), texture);
                entity = entity.with_sprite(texture);
            }
            Err(e) => log::warn!("Bubble {:?} has no sprite: {}", item.name, e),
        }

        let desc = BodyDesc::dynamic(ColliderDesc::Ball {
            radius: config.collision_radius(),
        })
        .with_position(spawn_position(index, width, config, rng))
        .with_collision_filter(BUBBLE_FILTER)
        .with_linear_damping(config.linear_damping)
        .with_can_sleep(false)
        .with_ccd(true);
        ids.push(ctx.spawn_with_body(entity, desc, material));
    }
    ids
}
