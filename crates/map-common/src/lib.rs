//! Common types shared across the raster map service crates.

pub mod bbox;
pub mod error;
pub mod worldfile;

pub use bbox::BoundingBox;
pub use error::{MapError, MapResult};
pub use worldfile::WorldFile;
