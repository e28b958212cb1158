use glam::Vec2;
use vault_engine::{BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId};

use crate::bowl::REPULSOR_FILTER;
use crate::config::BowlConfig;

/// An invisible static disc that follows the pointer and shoves bubbles aside.
#[derive(Debug, Clone, Copy)]
pub struct Repulsor {
    id: EntityId,
    parked: Vec2,
}

impl Repulsor {
    /// Spawn the repulsor at its parked position.
    pub fn spawn(ctx: &mut EngineContext, config: &BowlConfig) -> Self {
        let id = ctx.next_id();
        let desc = BodyDesc::fixed(ColliderDesc::Ball {
            radius: config.repulsor_radius,
        })
        .with_position(config.parked_position)
        .with_collision_filter(REPULSOR_FILTER);
        ctx.spawn_with_body(Entity::new(id).with_tag("repulsor"), desc, ColliderMaterial::default());
        Self {
            id,
            parked: config.parked_position,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Follow the pointer to container-local `pos`.
    pub fn move_to(&self, ctx: &mut EngineContext, pos: Vec2) {
        ctx.set_position(self.id, pos);
    }

    /// Send the repulsor far outside the bowl.
    pub fn park(&self, ctx: &mut EngineContext) {
        ctx.set_position(self.id, self.parked);
    }

    pub fn position(&self, ctx: &EngineContext) -> Option<Vec2> {
        ctx.position(self.id)
    }
}
