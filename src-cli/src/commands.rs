//! CLI command implementations.

use crate::colors;
use crate::exit_codes::ExitCode;
use crate::ExportOptions;
use markpad_common::StrokeFile;
use markpad_engine::media::MediaSource;
use markpad_engine::playback::{ChannelSink, PlaybackManager};
use markpad_engine::SaveError;
use markpad_engine::preview::{
    frame_to_jpeg_thumbnail, THUMBNAIL_MAX_HEIGHT, THUMBNAIL_MAX_WIDTH,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InfoReport {
    path: String,
    kind: &'static str,
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame_interval_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<PreviewReport>,
}

#[derive(Serialize)]
struct PreviewReport {
    jpeg_base64: String,
    width: u32,
    height: u32,
}

/// Inspect a media file and report its kind and first-frame geometry.
pub async fn info(path: &str, preview: bool, json: bool, quiet: bool) -> ExitCode {
    let path_buf = PathBuf::from(path);
    let source = match MediaSource::open(&path_buf) {
        Ok(source) => source,
        Err(e) => {
            if !quiet {
                eprintln!("{}", colors::error(&e.to_string()));
            }
            return ExitCode::from_load_error(&e);
        }
    };

    let (frame, source_kind, interval_ms) = match source {
        MediaSource::Still(frame) => (frame, "image", None),
        MediaSource::Stream(mut stream) => {
            let frame = match stream.read_next() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    if !quiet {
                        eprintln!("{}", colors::error("stream produced no frames"));
                    }
                    return ExitCode::StreamOpenFailed;
                }
                Err(e) => {
                    if !quiet {
                        eprintln!("{}", colors::error(&e.to_string()));
                    }
                    return ExitCode::StreamOpenFailed;
                }
            };
            let interval = stream.frame_interval();
            (frame, "video", Some(interval.as_millis() as u64))
        }
    };

    let preview_report = if preview {
        match frame_to_jpeg_thumbnail(&frame, THUMBNAIL_MAX_WIDTH, THUMBNAIL_MAX_HEIGHT) {
            Ok((jpeg_base64, width, height)) => Some(PreviewReport {
                jpeg_base64,
                width,
                height,
            }),
            Err(e) => {
                if !quiet {
                    eprintln!("{}", colors::warning(&format!("preview failed: {}", e)));
                }
                None
            }
        }
    } else {
        None
    };

    let report = InfoReport {
        path: path.to_string(),
        kind: source_kind,
        width: frame.width,
        height: frame.height,
        frame_interval_ms: interval_ms,
        preview: preview_report,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        println!("{} {}", colors::bold("Path:"), colors::path(&report.path));
        println!("{} {}", colors::bold("Kind:"), colors::kind(report.kind));
        println!(
            "{} {}",
            colors::bold("Size:"),
            colors::number(&format!("{}x{}", report.width, report.height))
        );
        if let Some(ms) = report.frame_interval_ms {
            println!(
                "{} {}",
                colors::bold("Frame interval:"),
                colors::number(&format!("{} ms", ms))
            );
        }
        if let Some(p) = &report.preview {
            println!(
                "{} {}",
                colors::bold("Preview:"),
                colors::dim(&format!("{}x{} JPEG, base64 follows", p.width, p.height))
            );
            println!("{}", p.jpeg_base64);
        }
    }

    ExitCode::Success
}

/// Composite the first frame of `input` with its stroke annotations and
/// save the result.
pub async fn export(input: &str, options: ExportOptions, json: bool, quiet: bool) -> ExitCode {
    let input_path = PathBuf::from(input);
    let strokes = match load_strokes(&input_path, options.strokes.as_deref(), quiet) {
        Ok(strokes) => strokes,
        Err(code) => return code,
    };

    // Frames published during export are not displayed anywhere
    let (sink, _frames) = ChannelSink::new(1);
    let player = PlaybackManager::new(sink);

    if let Err(e) = player.load(&input_path).await {
        if !quiet {
            eprintln!("{}", colors::error(&e.to_string()));
        }
        return ExitCode::from_load_error(&e);
    }

    if let Some(strokes) = strokes {
        player.install_strokes(strokes).await;
    }

    let output = options.output.map(PathBuf::from);
    let saved = player.save_annotated(output).await;
    player.shutdown().await;

    match saved {
        Ok(path) => {
            if json {
                println!(r#"{{"saved": "{}"}}"#, path.display());
            } else if !quiet {
                println!(
                    "{} {}",
                    colors::success("Saved"),
                    colors::path(&path.display().to_string())
                );
            }
            ExitCode::Success
        }
        Err(e) => {
            if !quiet {
                eprintln!("{}", colors::error(&e.to_string()));
            }
            match e {
                SaveError::Player(_) => ExitCode::GeneralError,
                SaveError::Encode(encode) => ExitCode::from_encode_error(&encode),
            }
        }
    }
}

/// Resolve and parse the stroke sidecar. An explicit `--strokes` path must
/// exist and parse; the implicit `<input>.strokes.json` sidecar is optional.
fn load_strokes(
    input: &Path,
    explicit: Option<&str>,
    quiet: bool,
) -> Result<Option<Vec<markpad_common::StrokeRecord>>, ExitCode> {
    let (path, required) = match explicit {
        Some(p) => (PathBuf::from(p), true),
        None => (sidecar_path(input), false),
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            if required {
                if !quiet {
                    eprintln!(
                        "{}",
                        colors::error(&format!("cannot read {}: {}", path.display(), e))
                    );
                }
                return Err(ExitCode::InvalidArguments);
            }
            return Ok(None);
        }
    };

    match StrokeFile::from_json(&text) {
        Ok(file) => Ok(Some(file.strokes)),
        Err(e) => {
            if !quiet {
                eprintln!(
                    "{}",
                    colors::error(&format!("invalid stroke file {}: {}", path.display(), e))
                );
            }
            Err(ExitCode::InvalidArguments)
        }
    }
}

/// Sidecar path for an input: `photo.png` -> `photo.png.strokes.json`.
fn sidecar_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".strokes.json");
    PathBuf::from(name)
}

/// Show version information.
pub fn version(json: bool) {
    let version = env!("CARGO_PKG_VERSION");
    if json {
        println!(r#"{{"version": "{}"}}"#, version);
    } else {
        println!("{} {}", colors::bold("markpad"), version);
    }
}
