//! Exit codes for the CLI.
//!
//! These codes enable scripting integration by providing structured
//! feedback about operation results.

use markpad_engine::{EncodeError, LoadError};

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,
    /// General/unspecified error
    GeneralError = 1,
    /// Invalid command-line arguments
    InvalidArguments = 2,
    /// File extension is not a supported image or video format
    UnsupportedFormat = 3,
    /// Image failed to decode
    DecodeFailed = 4,
    /// Video stream failed to open or produced no frames
    StreamOpenFailed = 5,
    /// Frame failed to encode
    EncodeFailed = 6,
    /// Output path is invalid or its directory is not writable
    UnwritablePath = 7,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a load failure to its exit code.
    pub fn from_load_error(e: &LoadError) -> Self {
        match e {
            LoadError::UnsupportedFormat(_) => ExitCode::UnsupportedFormat,
            LoadError::DecodeFailed(_) => ExitCode::DecodeFailed,
            LoadError::StreamOpenFailed(_) => ExitCode::StreamOpenFailed,
        }
    }

    /// Map an encode failure to its exit code.
    pub fn from_encode_error(e: &EncodeError) -> Self {
        match e {
            EncodeError::UnwritablePath(_) => ExitCode::UnwritablePath,
            EncodeError::EncodeFailed(_) => ExitCode::EncodeFailed,
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitCode::Success => write!(f, "success"),
            ExitCode::GeneralError => write!(f, "general error"),
            ExitCode::InvalidArguments => write!(f, "invalid arguments"),
            ExitCode::UnsupportedFormat => write!(f, "unsupported format"),
            ExitCode::DecodeFailed => write!(f, "decode failed"),
            ExitCode::StreamOpenFailed => write!(f, "stream open failed"),
            ExitCode::EncodeFailed => write!(f, "encode failed"),
            ExitCode::UnwritablePath => write!(f, "unwritable path"),
        }
    }
}
