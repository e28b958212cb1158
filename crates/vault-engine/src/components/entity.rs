use glam::Vec2;
use crate::api::types::{EntityId, TextureId};
use crate::core::physics::PhysicsBody;

/// Fat Entity: a single struct with optional components.
/// Collision geometry lives in `body`; the visual skin is a texture reference
/// resolved by the renderer, never by the physics world.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Position in world space.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Rendered edge length of the sprite in world units.
    pub size: f32,
    /// Sprite texture. Entities without one are invisible.
    pub sprite: Option<TextureId>,
    /// Physics body (optional).
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            size: 1.0,
            sprite: None,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_sprite(mut self, texture: TextureId) -> Self {
        self.sprite = Some(texture);
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether the renderer should draw this entity.
    pub fn is_visible(&self) -> bool {
        self.active && self.sprite.is_some()
    }
}
