pub mod color;
pub mod paint;
pub mod raster;
pub mod textures;
