//! Tests for output encoding and format-dependent transparency handling.

use image::{Rgba, RgbaImage};
use map_common::MapError;
use raster_engine::{encode, OutputFormat};

// ============================================================================
// Helper functions
// ============================================================================

/// Canvas with a color gradient and varying alpha (well over 256 colors).
fn gradient_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 3 % 256) as u8,
            (y * 5 % 256) as u8,
            ((x + y) % 256) as u8,
            (255 - (x % 128)) as u8,
        ])
    })
}

/// The compositor's untouched canvas: transparent white.
fn empty_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 0]))
}

// ============================================================================
// PNG
// ============================================================================

#[test]
fn test_png_round_trip_is_lossless() {
    let canvas = gradient_canvas(60, 40);
    let bytes = encode(&canvas, OutputFormat::Png).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), canvas.dimensions());
    assert_eq!(decoded.as_raw(), canvas.as_raw());
}

#[test]
fn test_png_preserves_full_transparency() {
    let canvas = empty_canvas(8, 8);
    let bytes = encode(&canvas, OutputFormat::Png).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert!(decoded.pixels().all(|p| p[3] == 0));
}

#[test]
fn test_png_signature() {
    let bytes = encode(&empty_canvas(4, 4), OutputFormat::Png).unwrap();
    assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
}

// ============================================================================
// JPEG
// ============================================================================

#[test]
fn test_jpeg_untouched_regions_are_opaque_white() {
    // The canvas is initialized to transparent white; JPEG discards alpha,
    // so regions no layer touched render as opaque white.
    let bytes = encode(&empty_canvas(32, 32), OutputFormat::Jpeg).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255]));
}

#[test]
fn test_jpeg_discards_alpha_but_keeps_rgb_values() {
    // Fully transparent non-white pixels keep their RGB values: alpha is
    // dropped, not blended against a background.
    let canvas = RgbaImage::from_pixel(32, 32, Rgba([10, 20, 30, 0]));
    let bytes = encode(&canvas, OutputFormat::Jpeg).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    let p = decoded.get_pixel(16, 16);
    assert!((i16::from(p[0]) - 10).abs() <= 3, "got {:?}", p);
    assert!((i16::from(p[1]) - 20).abs() <= 3, "got {:?}", p);
    assert!((i16::from(p[2]) - 30).abs() <= 3, "got {:?}", p);
}

#[test]
fn test_jpeg_has_no_alpha_channel() {
    let bytes = encode(&gradient_canvas(16, 16), OutputFormat::Jpeg).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert!(!decoded.color().has_alpha());
}

// ============================================================================
// GIF
// ============================================================================

#[test]
fn test_gif_round_trip_few_colors() {
    let mut canvas = RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 255]));
    for x in 0..10 {
        for y in 0..20 {
            canvas.put_pixel(x, y, Rgba([0, 0, 255, 255]));
        }
    }
    let bytes = encode(&canvas, OutputFormat::Gif).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (20, 20));
    // Palette quantization may nudge values; the halves must still be
    // unmistakably blue and red, and fully opaque.
    let left = decoded.get_pixel(5, 5);
    assert!(left[2] > 200 && left[0] < 50 && left[3] == 255, "got {:?}", left);
    let right = decoded.get_pixel(15, 5);
    assert!(right[0] > 200 && right[2] < 50 && right[3] == 255, "got {:?}", right);
}

#[test]
fn test_gif_transparency_is_binary() {
    // GIF pixels are either fully opaque or fully transparent.
    let mut canvas = empty_canvas(10, 10);
    for x in 0..5 {
        canvas.put_pixel(x, 0, Rgba([0, 128, 0, 255]));
    }
    let bytes = encode(&canvas, OutputFormat::Gif).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert!(decoded.pixels().all(|p| p[3] == 0 || p[3] == 255));
}

// ============================================================================
// Format dispatch
// ============================================================================

#[test]
fn test_all_formats_produce_nonempty_payloads() {
    let canvas = gradient_canvas(12, 12);
    for format in [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Gif] {
        let bytes = encode(&canvas, format).unwrap();
        assert!(!bytes.is_empty(), "empty payload for {format}");
    }
}

#[test]
fn test_unknown_format_is_rejected_at_parse() {
    assert!(matches!(
        OutputFormat::parse("image/tiff"),
        Err(MapError::UnsupportedFormat(_))
    ));
}
