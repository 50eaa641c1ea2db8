//! Additive compositing of a base frame and a rendered overlay.

use crate::error::PlayerError;
use crate::frame::Frame;

/// Merge `base` and `overlay` with straight addition per RGB channel,
/// clamped to the valid pixel range (weights 1.0/1.0, bias 0). The
/// output keeps the base frame's alpha channel.
///
/// Returns `NoActiveFrame` when the base is empty or the dimensions
/// disagree — both only happen when no source is actually displayed.
pub fn composite(base: &Frame, overlay: &Frame) -> Result<Frame, PlayerError> {
    if base.is_empty() || base.width != overlay.width || base.height != overlay.height {
        return Err(PlayerError::NoActiveFrame);
    }

    let mut out = base.clone();
    for (dst, src) in out.data.chunks_exact_mut(4).zip(overlay.data.chunks_exact(4)) {
        dst[0] = dst[0].saturating_add(src[0]);
        dst[1] = dst[1].saturating_add(src[1]);
        dst[2] = dst[2].saturating_add(src[2]);
        // Alpha stays the base's: the overlay only adds ink color
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Frame {
        let mut frame = Frame::blank(width, height);
        for chunk in frame.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
        frame
    }

    #[test]
    fn test_empty_overlay_is_identity() {
        let base = solid(4, 4, [10, 20, 30, 255]);
        let overlay = Frame::blank(4, 4);
        let out = composite(&base, &overlay).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn test_addition_clamps() {
        let base = solid(2, 2, [200, 100, 0, 255]);
        let overlay = solid(2, 2, [100, 100, 100, 255]);
        let out = composite(&base, &overlay).unwrap();
        assert_eq!(out.pixel(0, 0), Some([255, 200, 100, 255]));
    }

    #[test]
    fn test_alpha_preserved_from_base() {
        let base = solid(1, 1, [0, 0, 0, 128]);
        let overlay = solid(1, 1, [50, 50, 50, 255]);
        let out = composite(&base, &overlay).unwrap();
        assert_eq!(out.pixel(0, 0), Some([50, 50, 50, 128]));
    }

    #[test]
    fn test_deterministic_for_same_inputs() {
        let base = solid(3, 3, [1, 2, 3, 255]);
        let overlay = solid(3, 3, [4, 5, 6, 255]);
        let first = composite(&base, &overlay).unwrap();
        let second = composite(&base, &overlay).unwrap();
        assert_eq!(first.data, second.data);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let base = solid(2, 2, [0, 0, 0, 255]);
        let overlay = Frame::blank(3, 3);
        assert!(matches!(
            composite(&base, &overlay),
            Err(PlayerError::NoActiveFrame)
        ));
    }

    #[test]
    fn test_ink_changes_only_stroked_region() {
        let base = solid(8, 8, [10, 10, 10, 255]);
        let mut overlay = Frame::blank(8, 8);
        overlay.put_pixel(3, 3, [255, 0, 0, 255]);

        let out = composite(&base, &overlay).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let expected = if (x, y) == (3, 3) {
                    [255, 10, 10, 255]
                } else {
                    [10, 10, 10, 255]
                };
                assert_eq!(out.pixel(x, y), Some(expected));
            }
        }
    }
}
