pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::sim::{Simulation, SimConfig, EngineContext};
pub use api::types::{EntityId, TextureId, Viewport};
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::lifecycle::{FrameHost, HostError, LoopState, SimulationLoop, SkipReason};
pub use renderer::instance::{SpriteInstance, RenderBuffer};
pub use input::event::{InputEvent, PointerSource};
pub use assets::color::Rgba;
pub use assets::paint::{DrawSurface, PaintError, Stroke, SurfaceProvider, TextStyle};
pub use assets::raster::{RasterProvider, RasterSurface};
pub use assets::textures::{Texture, TextureRegistry};
pub use systems::rng::Rng;

pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionFilter,
};
