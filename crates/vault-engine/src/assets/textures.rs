use crate::api::types::TextureId;

/// An encoded image ready to be used as a sprite skin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// `data:` URL holding the encoded image.
    pub data_url: String,
}

/// Registry of generated textures, addressed by [`TextureId`].
/// Owned by the render side; physics bodies never hold pixels.
pub struct TextureRegistry {
    entries: Vec<(String, Texture)>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Store a texture under a human-readable name. Returns its id.
    pub fn insert(&mut self, name: impl Into<String>, texture: Texture) -> TextureId {
        let id = TextureId(self.entries.len() as u32);
        self.entries.push((name.into(), texture));
        id
    }

    /// Look up a texture by id. Returns None if not found.
    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.entries.get(id.0 as usize).map(|(_, t)| t)
    }

    /// The name a texture was registered under.
    pub fn name(&self, id: TextureId) -> Option<&str> {
        self.entries.get(id.0 as usize).map(|(n, _)| n.as_str())
    }

    /// Iterate over all textures in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &Texture)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (_, t))| (TextureId(i as u32), t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Release every texture.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}
