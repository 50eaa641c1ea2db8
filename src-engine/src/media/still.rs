//! Still-image decoding via the `image` crate.

use crate::error::LoadError;
use crate::frame::Frame;
use std::path::Path;
use tracing::debug;

/// Decode a still image into an RGBA frame.
pub fn decode(path: &Path) -> Result<Frame, LoadError> {
    let img = image::open(path).map_err(|e| LoadError::DecodeFailed(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());

    let frame = Frame::from_rgba(width, height, rgba.into_raw())
        .ok_or_else(|| LoadError::DecodeFailed("decoded buffer size mismatch".to_string()))?;

    if frame.is_empty() {
        return Err(LoadError::DecodeFailed(
            "decoded image has no pixels".to_string(),
        ));
    }

    debug!("Decoded still image {}x{}: {}", width, height, path.display());
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_test_png(name: &str, width: u32, height: u32) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_decode_png() {
        let path = write_test_png("markpad_still_decode.png", 16, 9);
        let frame = decode(&path).unwrap();
        assert_eq!(frame.width, 16);
        assert_eq!(frame.height, 9);
        assert_eq!(frame.pixel(0, 0), Some([0, 128, 255, 255]));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode(&PathBuf::from("/nonexistent/markpad.png"));
        assert!(matches!(result, Err(LoadError::DecodeFailed(_))));
    }

    #[test]
    fn test_decode_garbage_bytes() {
        let path = std::env::temp_dir().join("markpad_still_garbage.png");
        std::fs::write(&path, b"not an image").unwrap();
        let result = decode(&path);
        assert!(matches!(result, Err(LoadError::DecodeFailed(_))));
        let _ = std::fs::remove_file(path);
    }
}
