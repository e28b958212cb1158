use crate::api::types::TextureId;

/// Per-sprite draw command handed to the host each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteInstance {
    /// X position of the sprite center in world space.
    pub x: f32,
    /// Y position of the sprite center in world space.
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Rendered edge length in world units.
    pub size: f32,
    /// Texture to draw.
    pub texture: TextureId,
}

/// Render buffer containing all sprite instances for one frame, in draw order.
pub struct RenderBuffer {
    pub instances: Vec<SpriteInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: SpriteInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpriteInstance> {
        self.instances.iter()
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
