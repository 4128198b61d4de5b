//! Output encoding for composited canvases.

use image::buffer::ConvertBuffer;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage, RgbaImage};

use map_common::{MapError, MapResult};

const JPEG_QUALITY: u8 = 90;

/// The closed set of supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Gif,
}

impl OutputFormat {
    /// Parse a format name, accepting both the bare name ("png") and the
    /// MIME form ("image/png"). "jpg" aliases "jpeg". Anything else is an
    /// unsupported-format failure.
    pub fn parse(s: &str) -> MapResult<Self> {
        let name = s
            .trim()
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match name.as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "gif" => Ok(OutputFormat::Gif),
            _ => Err(MapError::UnsupportedFormat(s.to_string())),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Gif => "image/gif",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::Jpeg => write!(f, "jpeg"),
            OutputFormat::Gif => write!(f, "gif"),
        }
    }
}

/// Serialize a composited canvas into the requested format.
///
/// - PNG keeps the full RGBA canvas losslessly.
/// - JPEG has no alpha channel: alpha is discarded and the RGB values kept
///   as-is, so regions never touched by a layer come out opaque white.
/// - GIF is palette-based with fully-opaque-or-fully-transparent pixels
///   only; partial transparency does not survive.
pub fn encode(canvas: &RgbaImage, format: OutputFormat) -> MapResult<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut out)
                .write_image(
                    canvas.as_raw(),
                    canvas.width(),
                    canvas.height(),
                    ColorType::Rgba8,
                )
                .map_err(|e| MapError::RenderError(format!("png encoding: {e}")))?;
        }
        OutputFormat::Jpeg => {
            let rgb: RgbImage = canvas.convert();
            JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
                .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
                .map_err(|e| MapError::RenderError(format!("jpeg encoding: {e}")))?;
        }
        OutputFormat::Gif => {
            GifEncoder::new(&mut out)
                .encode(
                    canvas.as_raw(),
                    canvas.width(),
                    canvas.height(),
                    ColorType::Rgba8,
                )
                .map_err(|e| MapError::RenderError(format!("gif encoding: {e}")))?;
        }
    }
    Ok(out)
}
