//! Map request validation and multi-layer compositing.

use image::imageops;
use image::{GenericImageView, Rgba, RgbaImage};
use tracing::debug;

use map_common::{BoundingBox, MapError, MapResult};

use crate::encode::{self, OutputFormat};
use crate::registry::LayerRegistry;

/// One map request: viewport, output size, layer stack, and output format.
///
/// `layers` is ordered bottom-to-top; the order is significant for
/// overlapping translucent layers.
#[derive(Debug, Clone)]
pub struct MapRequest {
    pub bbox: BoundingBox,
    pub width: u32,
    pub height: u32,
    pub layers: Vec<String>,
    pub format: OutputFormat,
}

/// Composite the requested layer stack into a single RGBA canvas.
///
/// Validation and layer resolution happen before any pixel work: a zero
/// output dimension or an inverted bbox fails immediately, and one unknown
/// layer name fails the whole request with no partial canvas. Layers whose
/// extent misses the request window are skipped, which makes a request
/// fully outside every layer return a transparent canvas rather than an
/// error.
pub fn composite(request: &MapRequest, registry: &LayerRegistry) -> MapResult<RgbaImage> {
    if request.width == 0 {
        return Err(MapError::InvalidParameter {
            param: "WIDTH".to_string(),
            message: "must be a positive integer".to_string(),
        });
    }
    if request.height == 0 {
        return Err(MapError::InvalidParameter {
            param: "HEIGHT".to_string(),
            message: "must be a positive integer".to_string(),
        });
    }
    if !request.bbox.is_valid() {
        return Err(MapError::InvalidBbox(format!(
            "min must be less than max: [{}, {}, {}, {}]",
            request.bbox.min_x, request.bbox.min_y, request.bbox.max_x, request.bbox.max_y
        )));
    }

    let resolved = request
        .layers
        .iter()
        .map(|name| {
            registry
                .lookup(name)
                .ok_or_else(|| MapError::LayerNotFound(name.clone()))
        })
        .collect::<MapResult<Vec<_>>>()?;

    // Transparent white: the alpha channel hides it in PNG/GIF output, but
    // the JPEG path drops alpha and exposes the white.
    let mut canvas =
        RgbaImage::from_pixel(request.width, request.height, Rgba([255, 255, 255, 0]));

    for layer in resolved {
        let Some(clipped) = layer.clip_to_bbox(&request.bbox, request.width, request.height)
        else {
            debug!(layer = %layer.name(), "Layer does not overlap request bbox, skipping");
            continue;
        };
        if clipped.width() == 0 || clipped.height() == 0 {
            debug!(layer = %layer.name(), "Clip window collapsed to zero area, skipping");
            continue;
        }
        // Opaque where the source had no alpha channel.
        let top = clipped.to_rgba8();
        imageops::overlay(&mut canvas, &top, 0, 0);
    }

    Ok(canvas)
}

/// Composite and encode in one step: the full request pipeline.
pub fn render(request: &MapRequest, registry: &LayerRegistry) -> MapResult<Vec<u8>> {
    let canvas = composite(request, registry)?;
    encode::encode(&canvas, request.format)
}
