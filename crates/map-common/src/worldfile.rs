//! World file parsing and coordinate conversion.
//!
//! A world file is the six-line ASCII sidecar that georeferences a plain
//! raster image: an affine mapping between pixel indices and geographic
//! coordinates. Line order is `pixel_size_x, rotation_x, rotation_y,
//! pixel_size_y, origin_x, origin_y`, with `pixel_size_y` negative for
//! north-up imagery (the origin is the top-left pixel corner).

use std::path::Path;

use crate::bbox::BoundingBox;
use crate::error::{MapError, MapResult};

/// Six-parameter affine georeferencing for one raster.
///
/// Only axis-aligned transforms are handled: the rotation terms are parsed
/// and stored but never enter coordinate conversion. Sign conventions are
/// not checked at parse time; a transform with `pixel_size_x <= 0` or
/// `pixel_size_y >= 0` produces an inverted bounding box, which callers
/// must treat as invalid input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldFile {
    pub pixel_size_x: f64,
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub pixel_size_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl WorldFile {
    /// Parse world file content: six lines, one float each.
    pub fn parse(content: &str) -> MapResult<Self> {
        let values = content
            .lines()
            .take(6)
            .enumerate()
            .map(|(i, line)| {
                line.trim().parse::<f64>().map_err(|_| {
                    MapError::WorldFileParse(format!(
                        "line {} is not a number: '{}'",
                        i + 1,
                        line.trim()
                    ))
                })
            })
            .collect::<MapResult<Vec<f64>>>()?;

        if values.len() < 6 {
            return Err(MapError::WorldFileParse(format!(
                "expected 6 lines, found {}",
                values.len()
            )));
        }

        Ok(Self {
            pixel_size_x: values[0],
            rotation_x: values[1],
            rotation_y: values[2],
            pixel_size_y: values[3],
            origin_x: values[4],
            origin_y: values[5],
        })
    }

    /// Read and parse a world file from disk.
    pub fn from_path(path: &Path) -> MapResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MapError::WorldFileParse(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Geographic bounding box of a raster with the given pixel dimensions.
    ///
    /// `pixel_size_y` is negative for north-up imagery, so the origin row is
    /// the top edge and `min_y` lands below `max_y`.
    pub fn bounding_box(&self, width: u32, height: u32) -> BoundingBox {
        let min_x = self.origin_x;
        let max_y = self.origin_y;
        let max_x = min_x + f64::from(width) * self.pixel_size_x;
        let min_y = max_y + f64::from(height) * self.pixel_size_y;
        BoundingBox::new(min_x, min_y, max_x, max_y)
    }

    /// Convert geographic coordinates to (fractional) pixel coordinates.
    ///
    /// Scale and translation only; rotation terms are not applied.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) / self.pixel_size_x,
            (y - self.origin_y) / self.pixel_size_y,
        )
    }
}
