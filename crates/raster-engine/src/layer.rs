//! A georeferenced raster layer and its per-request clipping.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use map_common::{BoundingBox, MapError, MapResult, WorldFile};

/// One named, geo-anchored image source.
///
/// The pixel buffer is decoded once at load time and never mutated; the
/// geographic bounding box is computed from the buffer size and the world
/// file and cached for the layer's lifetime.
#[derive(Debug)]
pub struct RasterLayer {
    name: String,
    image: DynamicImage,
    world: WorldFile,
    bbox: BoundingBox,
}

impl RasterLayer {
    /// Load a layer from a raster image and its world file.
    pub fn load(
        name: impl Into<String>,
        image_path: &Path,
        world_path: &Path,
    ) -> MapResult<Self> {
        let world = WorldFile::from_path(world_path)?;
        let image = image::open(image_path).map_err(|e| {
            MapError::InternalError(format!("cannot decode {}: {}", image_path.display(), e))
        })?;
        Ok(Self::from_parts(name, image, world))
    }

    /// Build a layer from an already-decoded image.
    pub fn from_parts(name: impl Into<String>, image: DynamicImage, world: WorldFile) -> Self {
        let (width, height) = image.dimensions();
        let bbox = world.bounding_box(width, height);
        Self {
            name: name.into(),
            image,
            world,
            bbox,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Geographic bounding box of the full raster.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Clip this layer to a requested bounding box and output size.
    ///
    /// Returns `None` when the request window misses the raster entirely
    /// (a normal skip condition, not an error). When clamping collapses the
    /// window to zero width or height, a zero-area image is returned
    /// instead so the caller can tell "touching but empty" from "no
    /// overlap". Otherwise the clipped region is resampled to exactly
    /// `(out_width, out_height)` with a Lanczos3 filter.
    pub fn clip_to_bbox(
        &self,
        bbox: &BoundingBox,
        out_width: u32,
        out_height: u32,
    ) -> Option<DynamicImage> {
        // Request corners in this layer's pixel space, truncated toward
        // zero to match the source pixel-index convention. pixel_size_y is
        // negative, so the bbox top edge maps to the smaller row index.
        let (px_min, py_min) = self.world.geo_to_pixel(bbox.min_x, bbox.max_y);
        let (px_max, py_max) = self.world.geo_to_pixel(bbox.max_x, bbox.min_y);
        let px_min = px_min as i64;
        let py_min = py_min as i64;
        let px_max = px_max as i64;
        let py_max = py_max as i64;

        let width = i64::from(self.image.width());
        let height = i64::from(self.image.height());

        if px_max < 0 || py_max < 0 || px_min >= width || py_min >= height {
            return None;
        }

        let px_min = px_min.max(0);
        let py_min = py_min.max(0);
        let px_max = px_max.min(width);
        let py_max = py_max.min(height);

        let crop_w = (px_max - px_min) as u32;
        let crop_h = (py_max - py_min) as u32;
        let cropped = self
            .image
            .crop_imm(px_min as u32, py_min as u32, crop_w, crop_h);

        if crop_w == 0 || crop_h == 0 {
            return Some(cropped);
        }

        if (crop_w, crop_h) != (out_width, out_height) {
            return Some(cropped.resize_exact(out_width, out_height, FilterType::Lanczos3));
        }
        Some(cropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn unit_world() -> WorldFile {
        WorldFile::parse("1\n0\n0\n-1\n100\n200\n").unwrap()
    }

    fn test_layer() -> RasterLayer {
        let img = RgbaImage::from_pixel(50, 50, image::Rgba([10, 20, 30, 255]));
        RasterLayer::from_parts("test", DynamicImage::ImageRgba8(img), unit_world())
    }

    #[test]
    fn test_bbox_from_world_file() {
        let layer = test_layer();
        assert_eq!(layer.bbox(), BoundingBox::new(100.0, 150.0, 150.0, 200.0));
    }

    #[test]
    fn test_clip_disjoint_returns_none() {
        let layer = test_layer();
        let far = BoundingBox::new(500.0, 500.0, 600.0, 600.0);
        assert!(layer.clip_to_bbox(&far, 10, 10).is_none());
    }

    #[test]
    fn test_clip_contained_resamples_to_output_size() {
        let layer = test_layer();
        let inner = BoundingBox::new(110.0, 160.0, 140.0, 190.0);
        let clipped = layer.clip_to_bbox(&inner, 64, 32).unwrap();
        assert_eq!(clipped.dimensions(), (64, 32));
    }

    #[test]
    fn test_clip_exact_window_is_not_resampled() {
        let layer = test_layer();
        let whole = layer.bbox();
        let clipped = layer.clip_to_bbox(&whole, 50, 50).unwrap();
        assert_eq!(clipped.dimensions(), (50, 50));
    }
}
