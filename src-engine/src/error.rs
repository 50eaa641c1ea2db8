//! Error types for load, playback, and save operations.
//!
//! All errors are recoverable results surfaced to the front end; nothing in
//! the engine escalates to a panic or process exit.

use std::fmt;

/// Error type for loading a media source.
#[derive(Debug)]
pub enum LoadError {
    /// The path's extension maps to no supported source kind
    UnsupportedFormat(String),
    /// A still image failed to decode or decoded to an empty buffer
    DecodeFailed(String),
    /// A video stream could not be opened or produced no first frame
    StreamOpenFailed(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::UnsupportedFormat(ext) => write!(f, "Unsupported file format: {}", ext),
            LoadError::DecodeFailed(msg) => write!(f, "Image decode failed: {}", msg),
            LoadError::StreamOpenFailed(msg) => write!(f, "Stream open failed: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<LoadError> for String {
    fn from(err: LoadError) -> Self {
        err.to_string()
    }
}

/// Error type for operations that need an active frame or session.
#[derive(Debug)]
pub enum PlayerError {
    /// No source is loaded, so there is no frame to operate on
    NoActiveFrame,
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::NoActiveFrame => write!(f, "No active frame"),
        }
    }
}

impl std::error::Error for PlayerError {}

impl From<PlayerError> for String {
    fn from(err: PlayerError) -> Self {
        err.to_string()
    }
}

/// Error type for saving an encoded bitmap.
#[derive(Debug)]
pub enum EncodeError {
    /// The target path is invalid or its directory is not writable
    UnwritablePath(String),
    /// The encoder rejected the frame or the format is unsupported
    EncodeFailed(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnwritablePath(msg) => write!(f, "Unwritable path: {}", msg),
            EncodeError::EncodeFailed(msg) => write!(f, "Encode failed: {}", msg),
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<EncodeError> for String {
    fn from(err: EncodeError) -> Self {
        err.to_string()
    }
}

/// Error type for the composite-and-save convenience operation.
#[derive(Debug)]
pub enum SaveError {
    /// No active frame to composite
    Player(PlayerError),
    /// Path generation or encoding failed
    Encode(EncodeError),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Player(e) => e.fmt(f),
            SaveError::Encode(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<PlayerError> for SaveError {
    fn from(err: PlayerError) -> Self {
        SaveError::Player(err)
    }
}

impl From<EncodeError> for SaveError {
    fn from(err: EncodeError) -> Self {
        SaveError::Encode(err)
    }
}

impl From<SaveError> for String {
    fn from(err: SaveError) -> Self {
        err.to_string()
    }
}

/// Transient error while reading from a frame stream. The playback tick
/// treats these like exhaustion: rewind and keep going rather than stop.
#[derive(Debug)]
pub struct StreamError(pub String);

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream read error: {}", self.0)
    }
}

impl std::error::Error for StreamError {}

impl From<StreamError> for String {
    fn from(err: StreamError) -> Self {
        err.to_string()
    }
}
