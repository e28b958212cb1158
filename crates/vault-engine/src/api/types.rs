/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Identifies a texture in the [`TextureRegistry`](crate::assets::textures::TextureRegistry).
/// Entities reference textures by id; the renderer owns the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Size of the host surface the simulation lives in, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Width of the whole browser viewport (used for the minimum-width gate).
    pub window_width: f32,
    /// Measured client width of the container element.
    pub container_width: f32,
    /// Measured client height of the container element.
    pub container_height: f32,
    /// Device pixel ratio of the display.
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(window_width: f32, container_width: f32, container_height: f32) -> Self {
        Self {
            window_width,
            container_width,
            container_height,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Whether the container has been laid out with a non-zero area.
    pub fn has_area(&self) -> bool {
        self.container_width > 0.0 && self.container_height > 0.0
    }
}
