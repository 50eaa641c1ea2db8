//! Path validation for save targets.

use std::path::Path;

/// Path validation error types.
#[derive(Debug, Clone)]
pub enum PathError {
    /// Path contains directory traversal sequences (..)
    ContainsTraversal,
    /// Path contains null bytes
    ContainsNullByte,
    /// Path is too long
    TooLong(usize),
    /// Path has no file name component
    MissingFileName,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ContainsTraversal => write!(f, "Path contains directory traversal"),
            PathError::ContainsNullByte => write!(f, "Path contains null byte"),
            PathError::TooLong(len) => write!(f, "Path too long: {} chars", len),
            PathError::MissingFileName => write!(f, "Path has no file name"),
        }
    }
}

impl std::error::Error for PathError {}

/// Maximum path length in characters.
pub const MAX_PATH_LENGTH: usize = 4096;

/// Validate an output file path before handing it to an encoder.
///
/// Checks performed:
/// 1. Rejects paths containing null bytes
/// 2. Rejects paths that are too long
/// 3. Rejects paths containing ".." traversal sequences
/// 4. Requires a file name component
pub fn validate_output_path(path: &Path) -> Result<(), PathError> {
    let path_str = path.to_string_lossy();

    if path_str.contains('\0') {
        return Err(PathError::ContainsNullByte);
    }

    if path_str.len() > MAX_PATH_LENGTH {
        return Err(PathError::TooLong(path_str.len()));
    }

    for component in path.components() {
        if component.as_os_str() == ".." {
            return Err(PathError::ContainsTraversal);
        }
    }

    if path.file_name().is_none() {
        return Err(PathError::MissingFileName);
    }

    Ok(())
}
