//! Bitmap encoding for saved composites.

use crate::config;
use crate::error::EncodeError;
use crate::frame::Frame;
use chrono::Local;
use image::{ImageBuffer, Rgba};
use markpad_common::path_validation::validate_output_path;
use markpad_common::SaveFormat;
use std::path::{Path, PathBuf};
use tracing::info;

/// JPEG quality for saved composites (0-100).
const JPEG_QUALITY: u8 = 90;

/// Encode a frame to `path`, with the format chosen by the extension.
pub fn save_frame(path: &Path, frame: &Frame) -> Result<(), EncodeError> {
    validate_output_path(path).map_err(|e| EncodeError::UnwritablePath(e.to_string()))?;

    let format = SaveFormat::from_path(path).ok_or_else(|| {
        EncodeError::EncodeFailed(format!(
            "unsupported output extension: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
        ))
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(EncodeError::UnwritablePath(format!(
                "directory does not exist: {}",
                parent.display()
            )));
        }
    }

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| EncodeError::EncodeFailed("frame buffer size mismatch".to_string()))?;

    match format {
        SaveFormat::Png => img
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| EncodeError::EncodeFailed(e.to_string()))?,
        SaveFormat::Bmp => {
            // BMP has no alpha in most viewers; store as RGB
            let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb.save_with_format(path, image::ImageFormat::Bmp)
                .map_err(|e| EncodeError::EncodeFailed(e.to_string()))?
        }
        SaveFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
            let file = std::fs::File::create(path)
                .map_err(|e| EncodeError::UnwritablePath(e.to_string()))?;
            let mut writer = std::io::BufWriter::new(file);
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
            encoder
                .encode_image(&rgb)
                .map_err(|e| EncodeError::EncodeFailed(e.to_string()))?;
        }
    }

    info!("Saved composite: {}", path.display());
    Ok(())
}

/// Generate a timestamped default output path in the configured output
/// directory (falling back to the user's Pictures folder).
pub fn generate_output_path() -> Result<PathBuf, EncodeError> {
    let cfg = config::load_config();
    let output_dir =
        config::get_output_dir(&cfg).map_err(EncodeError::UnwritablePath)?;

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).map_err(|e| {
            EncodeError::UnwritablePath(format!("failed to create output directory: {}", e))
        })?;
    }
    config::validate_directory(&output_dir.to_string_lossy())
        .map_err(EncodeError::UnwritablePath)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");
    let filename = format!("annotated_{}.{}", timestamp, SaveFormat::default().extension());
    Ok(output_dir.join(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame() -> Frame {
        let mut frame = Frame::blank(8, 4);
        for y in 0..4 {
            for x in 0..8 {
                frame.put_pixel(x, y, [(x * 32) as u8, (y * 64) as u8, 128, 255]);
            }
        }
        frame
    }

    #[test]
    fn test_save_png_round_trip() {
        let path = std::env::temp_dir().join("markpad_encoder_test.png");
        let frame = gradient_frame();
        save_frame(&path, &frame).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.width(), 8);
        assert_eq!(reloaded.height(), 4);
        assert_eq!(reloaded.get_pixel(1, 1).0, [32, 64, 128, 255]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_save_jpeg_writes_file() {
        let path = std::env::temp_dir().join("markpad_encoder_test.jpg");
        save_frame(&path, &gradient_frame()).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("markpad_encoder_test.tiff");
        let result = save_frame(&path, &gradient_frame());
        assert!(matches!(result, Err(EncodeError::EncodeFailed(_))));
    }

    #[test]
    fn test_missing_directory() {
        let path = PathBuf::from("/nonexistent_markpad_dir/out.png");
        let result = save_frame(&path, &gradient_frame());
        assert!(matches!(result, Err(EncodeError::UnwritablePath(_))));
    }

    #[test]
    fn test_traversal_path_rejected() {
        let path = PathBuf::from("/tmp/../tmp/markpad_out.png");
        let result = save_frame(&path, &gradient_frame());
        assert!(matches!(result, Err(EncodeError::UnwritablePath(_))));
    }
}
