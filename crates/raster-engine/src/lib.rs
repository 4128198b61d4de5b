//! Raster clipping and compositing engine.
//!
//! Turns a geographic bounding box and an ordered stack of georeferenced
//! raster layers into one composited RGBA canvas, then encodes it:
//! - `layer`: a decoded raster plus its world file, clipped per request
//! - `registry`: layer discovery from paired world-file/image files
//! - `compose`: request validation and bottom-to-top alpha compositing
//! - `encode`: PNG/JPEG/GIF output encoding

pub mod compose;
pub mod encode;
pub mod layer;
pub mod registry;

pub use compose::{composite, render, MapRequest};
pub use encode::{encode, OutputFormat};
pub use layer::RasterLayer;
pub use registry::LayerRegistry;
