//! WMS (Web Map Service) request handlers.
//!
//! Handles the two operations of the query interface:
//! - GetCapabilities: JSON document listing every registered layer
//! - GetMap: clips and composites the requested layer stack into an image

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, instrument};

use map_common::{BoundingBox, MapError, MapResult};
use raster_engine::{MapRequest, OutputFormat};

use super::common::{error_response, wms_exception};
use crate::state::AppState;

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

// ============================================================================
// WMS Parameters
// ============================================================================

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct WmsParams {
    #[serde(rename = "SERVICE", alias = "service")]
    pub service: Option<String>,
    #[serde(rename = "REQUEST", alias = "request")]
    pub request: Option<String>,
    #[serde(rename = "VERSION", alias = "version")]
    pub version: Option<String>,
    #[serde(rename = "LAYERS", alias = "layers")]
    pub layers: Option<String>,
    // Accepted and ignored: no styling support
    #[serde(rename = "STYLES", alias = "styles")]
    pub styles: Option<String>,
    // Accepted and ignored: no reprojection support
    #[serde(rename = "SRS", alias = "CRS", alias = "srs", alias = "crs")]
    pub srs: Option<String>,
    #[serde(rename = "BBOX", alias = "bbox")]
    pub bbox: Option<String>,
    #[serde(rename = "WIDTH", alias = "width")]
    pub width: Option<String>,
    #[serde(rename = "HEIGHT", alias = "height")]
    pub height: Option<String>,
    #[serde(rename = "FORMAT", alias = "format")]
    pub format: Option<String>,
}

// ============================================================================
// WMS Handler Entry Point
// ============================================================================

#[instrument(skip(state))]
pub async fn wms_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<WmsParams>,
) -> Response {
    counter!("wms_requests_total").increment(1);

    // REQUEST defaults to GetMap when absent
    let request = params.request.as_deref().map(|s| s.to_uppercase());
    match request.as_deref().unwrap_or("GETMAP") {
        "GETCAPABILITIES" => wms_get_capabilities(state).await,
        "GETMAP" => wms_get_map(state, params).await,
        req => wms_exception(
            "OperationNotSupported",
            &format!("Unknown request: {}", req),
            StatusCode::BAD_REQUEST,
        ),
    }
}

// ============================================================================
// GetCapabilities
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub version: String,
    pub layers: Vec<LayerCapability>,
}

#[derive(Debug, Serialize)]
pub struct LayerCapability {
    pub name: String,
    pub bbox: BoundingBox,
    pub width: u32,
    pub height: u32,
}

async fn wms_get_capabilities(state: Arc<AppState>) -> Response {
    let layers = state
        .registry
        .iter()
        .map(|layer| LayerCapability {
            name: layer.name().to_string(),
            bbox: layer.bbox(),
            width: layer.width(),
            height: layer.height(),
        })
        .collect();

    Json(CapabilitiesResponse {
        version: "1.1.1".to_string(),
        layers,
    })
    .into_response()
}

// ============================================================================
// GetMap
// ============================================================================

async fn wms_get_map(state: Arc<AppState>, params: WmsParams) -> Response {
    let request = match parse_map_request(&params) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };

    let format = request.format;
    let registry = state.registry.clone();
    let started = Instant::now();

    // Clip/resample/composite/encode are CPU-bound; keep them off the
    // async dispatch path.
    let rendered =
        tokio::task::spawn_blocking(move || raster_engine::render(&request, &registry)).await;

    let bytes = match rendered {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            error!(error = %e, "GetMap request failed");
            return error_response(&e);
        }
        Err(e) => {
            error!(error = %e, "GetMap render task failed");
            return error_response(&MapError::InternalError(format!("render task: {}", e)));
        }
    };

    histogram!("getmap_render_seconds").record(started.elapsed().as_secs_f64());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .body(bytes.into())
        .unwrap()
}

/// Translate query parameters into a validated MapRequest.
///
/// BBOX and LAYERS are required; WIDTH/HEIGHT default to 800x600 and FORMAT
/// to PNG. SRS and STYLES are accepted but ignored.
fn parse_map_request(params: &WmsParams) -> MapResult<MapRequest> {
    let bbox_str = params
        .bbox
        .as_deref()
        .ok_or_else(|| MapError::MissingParameter("BBOX".to_string()))?;
    let bbox = BoundingBox::from_wms_string(bbox_str)?;

    let layers_str = params
        .layers
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| MapError::MissingParameter("LAYERS".to_string()))?;
    let layers = layers_str.split(',').map(str::to_string).collect();

    let width = parse_dimension(params.width.as_deref(), "WIDTH", DEFAULT_WIDTH)?;
    let height = parse_dimension(params.height.as_deref(), "HEIGHT", DEFAULT_HEIGHT)?;

    let format = match params.format.as_deref() {
        Some(f) => OutputFormat::parse(f)?,
        None => OutputFormat::Png,
    };

    Ok(MapRequest {
        bbox,
        width,
        height,
        layers,
        format,
    })
}

fn parse_dimension(value: Option<&str>, param: &str, default: u32) -> MapResult<u32> {
    match value {
        None => Ok(default),
        Some(s) => s.parse::<u32>().map_err(|_| MapError::InvalidParameter {
            param: param.to_string(),
            message: format!("not a valid integer: '{}'", s),
        }),
    }
}
