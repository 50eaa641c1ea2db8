//! Shared types for annotation and playback.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Still-image extensions accepted by the loader.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Video container extensions accepted by the loader.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "webm"];

/// Active annotation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// No tool selected; stroke input is ignored
    #[default]
    None,
    /// Freehand ink drawing
    Draw,
    /// Erase previously drawn ink near the cursor path
    Erase,
}

/// Playback lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// No source loaded
    #[default]
    Empty,
    /// A still image is displayed; no tick armed
    Still,
    /// A video stream is playing under a periodic tick
    Playing,
}

/// Kind of media source, classified by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Single decoded bitmap
    Still,
    /// Sequential frame stream
    Video,
}

impl SourceKind {
    /// Classify a path by its extension. Returns `None` for unsupported
    /// extensions (including paths without one).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(SourceKind::Still)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(SourceKind::Video)
        } else {
            None
        }
    }
}

/// Output format for saved composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    /// Lossless PNG (default)
    #[default]
    Png,
    /// JPEG (alpha dropped at encode time)
    Jpeg,
    /// Uncompressed BMP
    Bmp,
}

impl SaveFormat {
    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Jpeg => "jpg",
            SaveFormat::Bmp => "bmp",
        }
    }

    /// Determine the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(SaveFormat::Png),
            "jpg" | "jpeg" => Some(SaveFormat::Jpeg),
            "bmp" => Some(SaveFormat::Bmp),
            _ => None,
        }
    }

    /// Determine the format from an output path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// RGBA stroke color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: u8,
}

fn default_alpha() -> u8 {
    255
}

impl Default for StrokeColor {
    fn default() -> Self {
        // Opaque red, matching the classic annotation ink
        Self {
            r: 255,
            g: 0,
            b: 0,
            a: 255,
        }
    }
}

/// A single point of a stroke, in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
}

impl StrokePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &StrokePoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One recorded stroke: an ordered point sequence plus the tool mode and
/// style that were active when it was drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    pub points: Vec<StrokePoint>,
    /// Tool mode at draw time
    #[serde(default)]
    pub mode: ToolMode,
    /// Ink color
    #[serde(default)]
    pub color: StrokeColor,
    /// Stroke width in pixels
    #[serde(default = "default_stroke_width")]
    pub width: f32,
}

fn default_stroke_width() -> f32 {
    3.0
}

impl StrokeRecord {
    /// Create an empty draw stroke with the given style.
    pub fn new(mode: ToolMode, color: StrokeColor, width: f32) -> Self {
        Self {
            points: Vec::new(),
            mode,
            color,
            width,
        }
    }
}

/// Sidecar file holding a stroke set, for headless annotation workflows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrokeFile {
    pub strokes: Vec<StrokeRecord>,
}

impl StrokeFile {
    /// Parse a stroke file from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_source_kind_still_extensions() {
        for ext in IMAGE_EXTENSIONS {
            let path = PathBuf::from(format!("photo.{}", ext));
            assert_eq!(SourceKind::from_path(&path), Some(SourceKind::Still));
        }
    }

    #[test]
    fn test_source_kind_video_extensions() {
        for ext in VIDEO_EXTENSIONS {
            let path = PathBuf::from(format!("clip.{}", ext));
            assert_eq!(SourceKind::from_path(&path), Some(SourceKind::Video));
        }
    }

    #[test]
    fn test_source_kind_case_insensitive() {
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("PHOTO.JPG")),
            Some(SourceKind::Still)
        );
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("Clip.MP4")),
            Some(SourceKind::Video)
        );
    }

    #[test]
    fn test_source_kind_unsupported() {
        assert_eq!(SourceKind::from_path(&PathBuf::from("doc.pdf")), None);
        assert_eq!(SourceKind::from_path(&PathBuf::from("no_extension")), None);
    }

    #[test]
    fn test_save_format_round_trip() {
        assert_eq!(SaveFormat::from_extension("png"), Some(SaveFormat::Png));
        assert_eq!(SaveFormat::from_extension("JPEG"), Some(SaveFormat::Jpeg));
        assert_eq!(SaveFormat::from_extension("bmp"), Some(SaveFormat::Bmp));
        assert_eq!(SaveFormat::from_extension("gif"), None);
        assert_eq!(SaveFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn test_save_format_from_path() {
        assert_eq!(
            SaveFormat::from_path(&PathBuf::from("/tmp/out.png")),
            Some(SaveFormat::Png)
        );
        assert_eq!(SaveFormat::from_path(&PathBuf::from("/tmp/out")), None);
    }

    #[test]
    fn test_tool_mode_default() {
        assert_eq!(ToolMode::default(), ToolMode::None);
    }

    #[test]
    fn test_stroke_point_distance() {
        let a = StrokePoint::new(0.0, 0.0);
        let b = StrokePoint::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_stroke_file_serialization() {
        let mut stroke = StrokeRecord::new(ToolMode::Draw, StrokeColor::default(), 3.0);
        stroke.points.push(StrokePoint::new(1.0, 2.0));
        stroke.points.push(StrokePoint::new(3.0, 4.0));

        let file = StrokeFile {
            strokes: vec![stroke],
        };
        let json = file.to_json().unwrap();
        let parsed = StrokeFile::from_json(&json).unwrap();

        assert_eq!(parsed.strokes.len(), 1);
        assert_eq!(parsed.strokes[0].points.len(), 2);
        assert_eq!(parsed.strokes[0].mode, ToolMode::Draw);
    }

    #[test]
    fn test_stroke_file_defaults_applied() {
        // Minimal stroke entry: style fields fall back to defaults
        let json = r#"{"strokes": [{"points": [{"x": 1.0, "y": 2.0}]}]}"#;
        let parsed = StrokeFile::from_json(json).unwrap();

        let stroke = &parsed.strokes[0];
        assert_eq!(stroke.mode, ToolMode::None);
        assert_eq!(stroke.color, StrokeColor::default());
        assert_eq!(stroke.width, 3.0);
    }
}
