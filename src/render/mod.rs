//! Render step: rasterizes the world and blits it into the terminal buffer.

pub mod assets;
pub mod raster;
pub mod scene;

pub use assets::{AssetError, AssetKind, AssetStatus, Assets};
pub use raster::{Raster, Rotation};
pub use scene::render_world;
