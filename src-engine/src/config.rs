//! Configuration management for markpad.
//!
//! Handles loading and saving user configuration to platform-standard config
//! directories:
//! - Linux: `~/.config/markpad/config.json`
//! - macOS: `~/Library/Application Support/markpad/config.json`
//! - Windows: `%APPDATA%\markpad\config.json`

use directories::ProjectDirs;
use directories::UserDirs;
use markpad_common::StrokeColor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Output-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Custom output directory. If None, uses the system Pictures folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// Ink defaults for newly drawn strokes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InkConfig {
    /// Default stroke color.
    #[serde(default)]
    pub color: StrokeColor,
    /// Default stroke width in pixels.
    #[serde(default = "default_stroke_width")]
    pub width: f32,
}

fn default_stroke_width() -> f32 {
    3.0
}

impl Default for InkConfig {
    fn default() -> Self {
        Self {
            color: StrokeColor::default(),
            width: 3.0,
        }
    }
}

/// Playback-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlaybackConfig {
    /// Override for the tick interval in milliseconds. None means the
    /// stream's native rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Output settings group.
    #[serde(default)]
    pub output: OutputConfig,
    /// Ink settings group.
    #[serde(default)]
    pub ink: InkConfig,
    /// Playback settings group.
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl AppConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Get the path to the config file.
fn get_config_path() -> Result<PathBuf, String> {
    let proj_dirs =
        ProjectDirs::from("", "", "markpad").ok_or("Could not determine config directory")?;

    let config_dir = proj_dirs.config_dir();
    Ok(config_dir.join("config.json"))
}

/// Load configuration from disk.
/// Returns default config if the file doesn't exist or is invalid.
pub fn load_config() -> AppConfig {
    let config_path = match get_config_path() {
        Ok(path) => path,
        Err(e) => {
            warn!("Failed to get config path: {}", e);
            return AppConfig::default();
        }
    };

    if !config_path.exists() {
        return AppConfig::default();
    }

    match fs::read_to_string(&config_path) {
        Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse config file: {}. Using defaults.", e);
                AppConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}. Using defaults.", e);
            AppConfig::default()
        }
    }
}

/// Save configuration to disk.
/// Creates the config directory if it doesn't exist.
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let config_path = get_config_path()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    fs::write(&config_path, json).map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Get the default output directory (system Pictures folder).
pub fn get_default_output_dir() -> Result<PathBuf, String> {
    let user_dirs = UserDirs::new().ok_or("Could not determine user directories")?;

    // Try Pictures directory first, fall back to home directory
    let output_dir = user_dirs
        .picture_dir()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| {
            let home = user_dirs.home_dir().to_path_buf();
            let pictures = home.join("Pictures");
            if !pictures.exists() && fs::create_dir_all(&pictures).is_err() {
                return home;
            }
            pictures
        });

    Ok(output_dir)
}

/// Get the configured output directory, falling back to default if not set.
pub fn get_output_dir(config: &AppConfig) -> Result<PathBuf, String> {
    match &config.output.directory {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => get_default_output_dir(),
    }
}

/// Validate that a directory exists and is writable.
pub fn validate_directory(path: &str) -> Result<(), String> {
    let path = PathBuf::from(path);

    if !path.exists() {
        return Err("Directory does not exist".to_string());
    }

    if !path.is_dir() {
        return Err("Path is not a directory".to_string());
    }

    // Try to check if writable by creating a temp file
    let test_file = path.join(".markpad_write_test");
    match fs::write(&test_file, "test") {
        Ok(()) => {
            let _ = fs::remove_file(test_file);
            Ok(())
        }
        Err(_) => Err("Directory is not writable".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.output.directory.is_none());
        assert_eq!(config.ink.width, 3.0);
        assert_eq!(config.ink.color, StrokeColor::default());
        assert!(config.playback.interval_ms.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = AppConfig::default();
        config.output.directory = Some("/custom/path".to_string());
        config.playback.interval_ms = Some(40);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.output.directory, Some("/custom/path".to_string()));
        assert_eq!(parsed.playback.interval_ms, Some(40));
    }

    #[test]
    fn test_empty_directory_not_serialized() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("directory"));
    }

    #[test]
    fn test_config_backward_compatible() {
        // Older config without the playback group loads with defaults
        let json = r#"{"output": {}, "ink": {"width": 5.0}}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.ink.width, 5.0);
        assert!(parsed.playback.interval_ms.is_none());
    }

    #[test]
    fn test_validate_directory_missing() {
        assert!(validate_directory("/nonexistent_markpad_config_dir").is_err());
    }

    #[test]
    fn test_validate_directory_tempdir() {
        let dir = std::env::temp_dir();
        assert!(validate_directory(dir.to_str().unwrap()).is_ok());
    }
}
