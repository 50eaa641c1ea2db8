//! Preview thumbnail generation.
//!
//! Front-ends that list recent sources or show a load preview get a scaled
//! JPEG as base64 instead of holding the raw frame.

use crate::frame::Frame;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageBuffer, Rgba};

/// Maximum thumbnail width in pixels.
pub const THUMBNAIL_MAX_WIDTH: u32 = 320;

/// Maximum thumbnail height in pixels.
pub const THUMBNAIL_MAX_HEIGHT: u32 = 180;

/// JPEG quality for thumbnails (0-100).
const JPEG_QUALITY: u8 = 75;

/// Convert a frame to a scaled JPEG thumbnail as base64.
///
/// Returns a tuple of (base64_string, scaled_width, scaled_height).
pub fn frame_to_jpeg_thumbnail(
    frame: &Frame,
    max_width: u32,
    max_height: u32,
) -> Result<(String, u32, u32), String> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;

    let (scaled_width, scaled_height) =
        calculate_scaled_dimensions(frame.width, frame.height, max_width, max_height);

    let resized = image::imageops::resize(
        &img,
        scaled_width,
        scaled_height,
        image::imageops::FilterType::Triangle, // Fast filter for thumbnails
    );

    // Convert to RGB for JPEG encoding (drop alpha)
    let rgb_img = image::DynamicImage::ImageRgba8(resized).to_rgb8();

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, JPEG_QUALITY);
    encoder
        .encode_image(&rgb_img)
        .map_err(|e| format!("Failed to encode JPEG: {}", e))?;

    let base64_str = STANDARD.encode(&jpeg_bytes);

    Ok((base64_str, scaled_width, scaled_height))
}

/// Calculate scaled dimensions that fit within max bounds while preserving
/// aspect ratio.
fn calculate_scaled_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (max_width, max_height);
    }

    let width_ratio = max_width as f64 / width as f64;
    let height_ratio = max_height as f64 / height as f64;
    let scale = width_ratio.min(height_ratio).min(1.0); // Don't upscale

    let scaled_width = ((width as f64) * scale).round() as u32;
    let scaled_height = ((height as f64) * scale).round() as u32;

    // Ensure at least 1 pixel in each dimension
    (scaled_width.max(1), scaled_height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_scaled_dimensions_landscape() {
        // 1920x1080 -> max 320x180
        let (w, h) = calculate_scaled_dimensions(1920, 1080, 320, 180);
        assert_eq!(w, 320);
        assert_eq!(h, 180);
    }

    #[test]
    fn test_calculate_scaled_dimensions_portrait() {
        // 1080x1920 -> max 320x180
        let (w, h) = calculate_scaled_dimensions(1080, 1920, 320, 180);
        assert_eq!(w, 101); // Limited by height
        assert_eq!(h, 180);
    }

    #[test]
    fn test_calculate_scaled_dimensions_no_upscale() {
        let (w, h) = calculate_scaled_dimensions(100, 50, 320, 180);
        assert_eq!(w, 100);
        assert_eq!(h, 50);
    }

    #[test]
    fn test_frame_to_jpeg_thumbnail() {
        let mut frame = Frame::blank(10, 10);
        for chunk in frame.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[0, 0, 255, 255]);
        }

        let result = frame_to_jpeg_thumbnail(&frame, 320, 180);
        assert!(result.is_ok());

        let (base64_str, scaled_w, scaled_h) = result.unwrap();
        assert!(!base64_str.is_empty());
        assert_eq!(scaled_w, 10); // No upscaling
        assert_eq!(scaled_h, 10);
    }
}
