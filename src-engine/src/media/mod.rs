//! Media sources: still images and sequential frame streams.
//!
//! A source is classified by file extension, decoded/opened eagerly, and
//! exposes frames of a single fixed format and dimension for its lifetime.

pub mod still;
pub mod video;

use crate::error::{LoadError, StreamError};
use crate::frame::Frame;
use markpad_common::SourceKind;
use std::path::Path;
use std::time::Duration;

/// Fallback tick interval when a stream's native rate is unknown (~30 fps).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// A sequential, rewindable frame decoder.
///
/// `read_next` returning `Ok(None)` means the stream is exhausted; the
/// caller rewinds and continues, so a stream never "ends" from the
/// player's perspective.
pub trait FrameStream: Send {
    /// Read the next decoded frame, or `Ok(None)` at end of stream.
    fn read_next(&mut self) -> Result<Option<Frame>, StreamError>;

    /// Reset the stream position to its first frame.
    fn rewind(&mut self) -> Result<(), StreamError>;

    /// Native interval between frames, used to pace playback ticks.
    fn frame_interval(&self) -> Duration;
}

/// An opened media source.
pub enum MediaSource {
    /// One immutable decoded frame
    Still(Frame),
    /// Handle to a sequential frame decoder
    Stream(Box<dyn FrameStream>),
}

impl MediaSource {
    /// Classify `path` by extension and open the corresponding source.
    ///
    /// Stills decode synchronously; streams are opened but not yet read.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        match SourceKind::from_path(path) {
            Some(SourceKind::Still) => {
                let frame = still::decode(path)?;
                Ok(MediaSource::Still(frame))
            }
            Some(SourceKind::Video) => {
                let stream = video::VideoStream::open(path)?;
                Ok(MediaSource::Stream(Box::new(stream)))
            }
            None => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("(none)")
                    .to_string();
                Err(LoadError::UnsupportedFormat(ext))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_open_unsupported_extension() {
        let result = MediaSource::open(&PathBuf::from("/tmp/document.txt"));
        assert!(matches!(result, Err(LoadError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_open_no_extension() {
        let result = MediaSource::open(&PathBuf::from("/tmp/noext"));
        assert!(matches!(result, Err(LoadError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_open_missing_still_fails_decode() {
        let result = MediaSource::open(&PathBuf::from("/nonexistent/picture.png"));
        assert!(matches!(result, Err(LoadError::DecodeFailed(_))));
    }
}
