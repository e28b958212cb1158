use std::f32::consts::PI;

use glam::Vec2;
use serde::Deserialize;

/// Largest sprite edge accepted from JSON.
pub const MAX_SPRITE_SIZE: u32 = 1024;

/// Tunables for the bowl, its bubbles and the pointer repulsor.
/// Lengths are CSS pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BowlConfig {
    /// Radius of the painted ring.
    pub visual_radius: f32,
    /// Added to `visual_radius` for the collider so rings look like they touch.
    pub collision_margin: f32,
    /// Horizontal spawn jitter, ± around the container center.
    pub spawn_jitter: f32,
    /// Height above the container top where the first bubble spawns.
    pub spawn_offset: f32,
    /// Vertical gap between consecutive spawns.
    pub spawn_spacing: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Air drag on bubbles.
    pub linear_damping: f32,
    pub wall_restitution: f32,
    pub wall_friction: f32,
    pub wall_thickness: f32,
    /// Tilt of the two funnel walls in radians.
    pub wall_angle: f32,
    /// Floor width as a fraction of container width.
    pub floor_width_ratio: f32,
    pub repulsor_radius: f32,
    /// Where the repulsor waits while no pointer is over the container.
    pub parked_position: Vec2,
    /// Edge length of a bubble sprite, clamped to `1..=MAX_SPRITE_SIZE`.
    pub sprite_size: u32,
    pub stroke_width: f32,
    pub glow_blur: f32,
    pub font_px: f32,
    /// Seed for spawn jitter. `None` seeds from the catalog size.
    pub seed: Option<u64>,
}

impl Default for BowlConfig {
    fn default() -> Self {
        Self {
            visual_radius: 27.0,
            collision_margin: 3.0,
            spawn_jitter: 20.0,
            spawn_offset: 50.0,
            spawn_spacing: 60.0,
            restitution: 0.6,
            friction: 0.1,
            linear_damping: 0.6,
            wall_restitution: 0.4,
            wall_friction: 0.05,
            wall_thickness: 40.0,
            wall_angle: PI / 3.5,
            floor_width_ratio: 0.4,
            repulsor_radius: 40.0,
            parked_position: Vec2::new(-2000.0, -2000.0),
            sprite_size: 120,
            stroke_width: 3.0,
            glow_blur: 12.0,
            font_px: 11.0,
            seed: None,
        }
    }
}

impl BowlConfig {
    /// Parse a partial override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.sprite_size = config.sprite_size.clamp(1, MAX_SPRITE_SIZE);
        Ok(config)
    }

    pub fn collision_radius(&self) -> f32 {
        self.visual_radius + self.collision_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = BowlConfig::from_json(r#"{ "visual_radius": 20, "parked_position": [-500, -500] }"#).unwrap();
        assert_eq!(config.visual_radius, 20.0);
        assert_eq!(config.collision_radius(), 23.0);
        assert_eq!(config.parked_position, Vec2::new(-500.0, -500.0));
        assert_eq!(config.restitution, 0.6);
        assert_eq!(config.sprite_size, 120);
    }

    #[test]
    fn spawn_spacing_stacks_bubbles_without_overlap() {
        let config = BowlConfig::default();
        assert_eq!(config.spawn_spacing, config.collision_radius() * 2.0);
    }

    #[test]
    fn bubbles_carry_air_drag_by_default() {
        let config = BowlConfig::default();
        assert_eq!(config.linear_damping, 0.6);
        let still = BowlConfig::from_json(r#"{ "linear_damping": 0 }"#).unwrap();
        assert_eq!(still.linear_damping, 0.0);
    }

    #[test]
    fn oversized_sprite_is_clamped() {
        let huge = BowlConfig::from_json(r#"{ "sprite_size": 100000 }"#).unwrap();
        assert_eq!(huge.sprite_size, MAX_SPRITE_SIZE);
        let empty = BowlConfig::from_json(r#"{ "sprite_size": 0 }"#).unwrap();
        assert_eq!(empty.sprite_size, 1);
    }
}
