//! Video frame stream decoded via FFmpeg (ffmpeg-sidecar).
//!
//! Frames are pulled from a spawned ffmpeg child as raw rgb24 and widened
//! to RGBA. Rewinding respawns the child at the start of the file; FFmpeg
//! keeps no seek state we could reuse across a rawvideo pipe.

use crate::error::{LoadError, StreamError};
use crate::frame::Frame;
use crate::media::DEFAULT_FRAME_INTERVAL;
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, StreamTypeSpecificData};
use ffmpeg_sidecar::iter::FfmpegIterator;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// A rewindable frame stream over a video file.
pub struct VideoStream {
    path: PathBuf,
    child: Option<FfmpegChild>,
    events: Option<FfmpegIterator>,
    /// Native frame rate parsed from stream metadata, if any
    fps: Option<f32>,
}

impl VideoStream {
    /// Spawn an ffmpeg decoder for `path`.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::StreamOpenFailed(format!(
                "no such file: {}",
                path.display()
            )));
        }

        let mut stream = Self {
            path: path.to_path_buf(),
            child: None,
            events: None,
            fps: None,
        };
        stream
            .spawn_decoder()
            .map_err(|e| LoadError::StreamOpenFailed(e.0))?;
        debug!("Opened video stream: {}", path.display());
        Ok(stream)
    }

    fn spawn_decoder(&mut self) -> Result<(), StreamError> {
        let mut child = FfmpegCommand::new()
            .input(self.path.to_string_lossy().as_ref())
            .args(["-an"])
            .rawvideo()
            .spawn()
            .map_err(|e| StreamError(format!("failed to spawn ffmpeg: {}", e)))?;

        let events = child
            .iter()
            .map_err(|e| StreamError(format!("failed to read ffmpeg output: {}", e)))?;

        self.child = Some(child);
        self.events = Some(events);
        Ok(())
    }

    /// Kill and reap the current ffmpeg child. Safe to call repeatedly.
    fn release_decoder(&mut self) {
        self.events = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    /// Widen an rgb24 buffer to an RGBA frame.
    fn rgb24_to_frame(width: u32, height: u32, rgb: &[u8]) -> Option<Frame> {
        let pixels = (width as usize) * (height as usize);
        if rgb.len() < pixels * 3 {
            return None;
        }
        let mut data = Vec::with_capacity(pixels * 4);
        for px in rgb[..pixels * 3].chunks_exact(3) {
            data.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Frame::from_rgba(width, height, data)
    }
}

impl super::FrameStream for VideoStream {
    fn read_next(&mut self) -> Result<Option<Frame>, StreamError> {
        let events = match self.events.as_mut() {
            Some(events) => events,
            None => return Ok(None),
        };

        for event in events {
            match event {
                FfmpegEvent::OutputFrame(f) => {
                    match Self::rgb24_to_frame(f.width, f.height, &f.data) {
                        Some(frame) => return Ok(Some(frame)),
                        None => {
                            return Err(StreamError(format!(
                                "short frame buffer for {}x{}",
                                f.width, f.height
                            )))
                        }
                    }
                }
                FfmpegEvent::ParsedInputStream(stream) => {
                    if let StreamTypeSpecificData::Video(video) = &stream.type_specific_data {
                        if video.fps > 0.0 {
                            self.fps = Some(video.fps);
                        }
                    }
                }
                FfmpegEvent::Error(msg) | FfmpegEvent::Log(LogLevel::Error, msg) => {
                    warn!("ffmpeg: {}", msg);
                }
                _ => {}
            }
        }

        // Event stream drained: end of file
        Ok(None)
    }

    fn rewind(&mut self) -> Result<(), StreamError> {
        self.release_decoder();
        self.spawn_decoder()
    }

    fn frame_interval(&self) -> Duration {
        match self.fps {
            Some(fps) if fps > 0.0 => interval_from_fps(fps),
            _ => DEFAULT_FRAME_INTERVAL,
        }
    }
}

impl Drop for VideoStream {
    fn drop(&mut self) {
        self.release_decoder();
    }
}

/// Tick interval for a native frame rate.
fn interval_from_fps(fps: f32) -> Duration {
    Duration::from_secs_f64(1.0 / fps as f64)
}
