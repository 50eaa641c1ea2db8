//! Frame buffer type shared across the decode/display/encode pipeline.

/// A decoded frame: row-major RGBA8 pixels with fixed dimensions.
///
/// Every source in the pipeline produces RGBA8 for its whole lifetime, so
/// the buffer carries no per-frame format tag. Hand-off between the
/// playback task and a display sink is always a move or an explicit clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, `width * height * 4` bytes
    pub data: Vec<u8>,
}

impl Frame {
    /// Bytes per pixel for RGBA8.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Construct a frame from an RGBA buffer. Returns `None` when the
    /// buffer length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * Self::BYTES_PER_PIXEL {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// A fully transparent black frame of the given dimensions.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * Self::BYTES_PER_PIXEL],
        }
    }

    /// True when the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Byte offset of the pixel at (x, y), without bounds checking the
    /// underlying buffer.
    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * Self::BYTES_PER_PIXEL
    }

    /// RGBA value at (x, y). Returns `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        Some([
            self.data[o],
            self.data[o + 1],
            self.data[o + 2],
            self.data[o + 3],
        ])
    }

    /// Overwrite the RGBA value at (x, y). Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let o = self.offset(x, y);
        self.data[o..o + 4].copy_from_slice(&rgba);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_validates_length() {
        assert!(Frame::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Frame::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_blank_is_transparent() {
        let frame = Frame::blank(3, 2);
        assert_eq!(frame.data.len(), 24);
        assert_eq!(frame.pixel(2, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_pixel_round_trip() {
        let mut frame = Frame::blank(4, 4);
        frame.put_pixel(1, 2, [10, 20, 30, 40]);
        assert_eq!(frame.pixel(1, 2), Some([10, 20, 30, 40]));
        assert_eq!(frame.pixel(4, 0), None);
    }

    #[test]
    fn test_out_of_bounds_write_ignored() {
        let mut frame = Frame::blank(2, 2);
        frame.put_pixel(5, 5, [255; 4]);
        assert!(frame.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_is_empty() {
        assert!(Frame::blank(0, 10).is_empty());
        assert!(!Frame::blank(1, 1).is_empty());
    }
}
