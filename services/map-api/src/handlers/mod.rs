//! HTTP request handlers.
//!
//! This module is organized into submodules:
//! - `wms`: WMS GetCapabilities and GetMap handlers
//! - `metrics`: Health check and Prometheus metrics handlers
//! - `common`: Shared utilities (exception responses, error mapping)

pub mod common;
pub mod metrics;
pub mod wms;

pub use common::{error_response, wms_exception};
pub use metrics::{health_handler, metrics_handler};
pub use wms::{wms_handler, WmsParams};
