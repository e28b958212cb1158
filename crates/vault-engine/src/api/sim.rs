use glam::Vec2;
use serde::Deserialize;

use crate::api::types::{EntityId, Viewport};
use crate::assets::paint::SurfaceProvider;
use crate::assets::textures::TextureRegistry;
use crate::components::entity::Entity;
use crate::core::physics::{BodyDesc, ColliderMaterial, PhysicsWorld};
use crate::core::scene::Scene;
use crate::input::event::InputEvent;

/// Configuration for the engine, provided by the simulation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Physics step per displayed frame, in seconds (default: 1/60).
    /// One step runs per animation frame, so simulated speed follows the
    /// display's frame rate.
    pub step_dt: f32,
    /// Gravity vector in world units/s². Y-down: positive Y falls.
    pub gravity: Vec2,
    /// Narrowest browser viewport (CSS px) that hosts the simulation at all.
    pub min_viewport_width: f32,
    /// World units per physics "meter" (Rapier tolerances scale with it).
    pub length_unit: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_dt: 1.0 / 60.0,
            gravity: Vec2::new(0.0, 1000.0),
            min_viewport_width: 1024.0,
            length_unit: 100.0,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The contract a simulation hosted by [`SimulationLoop`](crate::core::lifecycle::SimulationLoop)
/// must fulfill.
pub trait Simulation {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> SimConfig {
        SimConfig::default()
    }

    /// Whether the simulation's input data has arrived. The loop stays
    /// Uninitialized until this returns true.
    fn is_ready(&self) -> bool {
        true
    }

    /// Build every body and texture for a container of the given size.
    fn init(&mut self, ctx: &mut EngineContext, surfaces: &mut dyn SurfaceProvider, viewport: Viewport);

    /// Per-frame hook, called before the physics step.
    fn update(&mut self, _ctx: &mut EngineContext) {}

    /// Handle a pointer event synchronously, between frames.
    fn on_input(&mut self, _ctx: &mut EngineContext, _event: InputEvent) {}
}

/// Mutable access to engine state, passed to `Simulation::init` and `Simulation::update`.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub textures: TextureRegistry,
    next_id: u32,
}

impl EngineContext {
    /// Create a context whose physics world follows `config`.
    pub fn new(config: &SimConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.step_dt);
        physics.set_length_unit(config.length_unit);
        Self {
            scene: Scene::new(),
            physics,
            textures: TextureRegistry::new(),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position is set from the BodyDesc.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Teleport an entity's body (and the entity) to `pos`.
    pub fn set_position(&mut self, id: EntityId, pos: Vec2) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
            if let Some(body) = &entity.body {
                self.physics.set_body_position(body, pos);
            }
        }
    }

    /// Current world position of an entity, if it exists.
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.scene.get(id).map(|e| e.pos)
    }

    /// Get the linear velocity of an entity's physics body.
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Step the physics simulation and sync positions back to entities.
    pub fn step_physics(&mut self) {
        self.physics.step();

        // Sync Rapier body positions back to entity positions
        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }

    /// Release every entity, body and texture.
    pub fn clear(&mut self) {
        self.scene.clear();
        self.physics.clear();
        self.textures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::ColliderDesc;

    #[test]
    fn spawn_with_body_creates_entity_and_physics() {
        let mut ctx = EngineContext::new(&SimConfig::default());
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
            .with_position(Vec2::new(100.0, 200.0));

        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());

        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
        assert_eq!(ctx.position(id), Some(Vec2::new(100.0, 200.0)));
    }

    #[test]
    fn step_physics_syncs_positions() {
        let mut ctx = EngineContext::new(&SimConfig::default());
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
            .with_position(Vec2::new(100.0, 0.0));

        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());
        for _ in 0..10 {
            ctx.step_physics();
        }

        let y = ctx.position(id).unwrap().y;
        assert!(y > 0.0, "Entity should have moved down: y={}", y);
        assert!(ctx.velocity(id).y > 0.0);
    }

    #[test]
    fn set_position_moves_fixed_body_and_entity() {
        let mut ctx = EngineContext::new(&SimConfig::default());
        let id = ctx.next_id();
        let desc = BodyDesc::fixed(ColliderDesc::Ball { radius: 40.0 });
        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());

        ctx.set_position(id, Vec2::new(-2000.0, -2000.0));
        assert_eq!(ctx.position(id), Some(Vec2::new(-2000.0, -2000.0)));
        let body = ctx.scene.get(id).unwrap().body.unwrap();
        assert_eq!(ctx.physics.body_position(&body).0, Vec2::new(-2000.0, -2000.0));
    }

    #[test]
    fn config_from_partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "min_viewport_width": 800 }"#).unwrap();
        assert_eq!(config.min_viewport_width, 800.0);
        assert_eq!(config.gravity, Vec2::new(0.0, 1000.0));
        assert!((config.step_dt - 1.0 / 60.0).abs() < 1e-6);
    }
}
