//! Raster map API service library.
//!
//! This module exposes the internal modules for testing purposes.

pub mod handlers;
pub mod router;
pub mod state;
