//! Containment geometry: an open-top funnel of five static, invisible walls.

use glam::Vec2;
use vault_engine::{BodyDesc, ColliderDesc, ColliderMaterial, CollisionFilter};

use crate::config::BowlConfig;

pub const GROUP_WALLS: u32 = 1 << 0;
pub const GROUP_BUBBLES: u32 = 1 << 1;
pub const GROUP_REPULSOR: u32 = 1 << 2;

/// Walls touch bubbles only.
pub const WALL_FILTER: CollisionFilter = CollisionFilter::new(GROUP_WALLS, GROUP_BUBBLES);
/// Bubbles touch everything.
pub const BUBBLE_FILTER: CollisionFilter =
    CollisionFilter::new(GROUP_BUBBLES, GROUP_WALLS | GROUP_BUBBLES | GROUP_REPULSOR);
/// The repulsor touches bubbles only, never walls.
pub const REPULSOR_FILTER: CollisionFilter = CollisionFilter::new(GROUP_REPULSOR, GROUP_BUBBLES);

/// Thickness of the two outer walls.
const OUTER_WALL_WIDTH: f32 = 20.0;
/// Distance of the floor center above the container bottom.
const FLOOR_INSET: f32 = 25.0;

/// The five wall bodies for a `width` x `height` container: the left and
/// right funnel walls, the floor, then the outer left and right walls.
pub fn bowl_walls(width: f32, height: f32, config: &BowlConfig) -> Vec<BodyDesc> {
    let half_thickness = config.wall_thickness / 2.0;
    let wall = |center: Vec2, half_width: f32, half_height: f32, angle: f32| {
        BodyDesc::fixed(ColliderDesc::Cuboid { half_width, half_height })
            .with_position(center)
            .with_rotation(angle)
            .with_collision_filter(WALL_FILTER)
    };

    vec![
        wall(Vec2::new(width * 0.2, height * 0.7), width / 2.0, half_thickness, config.wall_angle),
        wall(Vec2::new(width * 0.8, height * 0.7), width / 2.0, half_thickness, -config.wall_angle),
        wall(
            Vec2::new(width / 2.0, height - FLOOR_INSET),
            width * config.floor_width_ratio / 2.0,
            half_thickness,
            0.0,
        ),
        wall(
            Vec2::new(-OUTER_WALL_WIDTH / 2.0, height / 2.0),
            OUTER_WALL_WIDTH / 2.0,
            height / 2.0,
            0.0,
        ),
        wall(
            Vec2::new(width + OUTER_WALL_WIDTH / 2.0, height / 2.0),
            OUTER_WALL_WIDTH / 2.0,
            height / 2.0,
            0.0,
        ),
    ]
}

pub fn wall_material(config: &BowlConfig) -> ColliderMaterial {
    ColliderMaterial {
        restitution: config.wall_restitution,
        friction: config.wall_friction,
        ..ColliderMaterial::default()
    }
}
