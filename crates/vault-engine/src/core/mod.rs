pub mod lifecycle;
pub mod physics;
pub mod scene;
