//! Layer discovery and lookup.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use map_common::{MapError, MapResult};

use crate::layer::RasterLayer;

/// Extension of the world file that anchors each layer.
pub const WORLD_FILE_EXT: &str = "tfw";

/// Image extensions searched for a layer's raster, in priority order.
pub const IMAGE_EXT_PRIORITY: [&str; 4] = ["tif", "jpg", "png", "gif"];

/// The set of raster layers available to map requests, keyed by name.
///
/// Built once at startup and read-only afterward; a hot-reload variant
/// would swap the whole registry atomically rather than mutate layers in
/// place. Storage is a `BTreeMap` so `names()` is deterministic.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: BTreeMap<String, RasterLayer>,
}

impl LayerRegistry {
    /// Scan a directory for paired world-file/image layers.
    ///
    /// A missing directory is created and yields an empty registry. Every
    /// `<base>.tfw` file is paired with the first existing
    /// `<base>.<ext>` from [`IMAGE_EXT_PRIORITY`]; world files without an
    /// image are skipped with a warning. A malformed world file or an
    /// undecodable image fails discovery.
    pub fn discover(dir: &Path) -> MapResult<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            warn!(directory = %dir.display(), "Created layers directory");
            return Ok(Self::default());
        }

        let mut layers = BTreeMap::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry =
                entry.map_err(|e| MapError::InternalError(format!("directory scan: {e}")))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(WORLD_FILE_EXT) {
                continue;
            }
            let Some(base) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let image_path = IMAGE_EXT_PRIORITY
                .iter()
                .map(|ext| dir.join(format!("{base}.{ext}")))
                .find(|p| p.exists());

            match image_path {
                Some(image_path) => {
                    let layer = RasterLayer::load(base, &image_path, path)?;
                    info!(layer = %base, image = %image_path.display(), "Loaded layer");
                    layers.insert(base.to_string(), layer);
                }
                None => {
                    warn!(world_file = %path.display(), "No image file found for world file");
                }
            }
        }

        Ok(Self { layers })
    }

    /// Build a registry from pre-constructed layers. Later duplicates of a
    /// name overwrite earlier ones.
    pub fn from_layers(layers: impl IntoIterator<Item = RasterLayer>) -> Self {
        Self {
            layers: layers
                .into_iter()
                .map(|l| (l.name().to_string(), l))
                .collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&RasterLayer> {
        self.layers.get(name)
    }

    /// All registered layer names, in deterministic (sorted) order.
    pub fn names(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RasterLayer> {
        self.layers.values()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
