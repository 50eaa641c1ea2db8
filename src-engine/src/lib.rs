//! Markpad Annotation Engine
//!
//! Headless core of the markpad image/video annotation tool. A front end
//! (GUI canvas or the markpad CLI) loads a still image or a video file,
//! draws ink strokes over the displayed frame, and saves the composited
//! bitmap. This crate owns the playback state machine, the stroke overlay,
//! the compositor, and the encoders; widget rendering and file dialogs stay
//! in the front end.
//!
//! # Example
//!
//! ```rust,no_run
//! use markpad_engine::playback::{ChannelSink, PlaybackManager};
//! use markpad_common::ToolMode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (sink, mut frames) = ChannelSink::new(8);
//!     let player = PlaybackManager::new(sink);
//!     player.load("clip.mp4").await?;
//!     let first = frames.recv().await.expect("first frame published on load");
//!     println!("{}x{}", first.width, first.height);
//!     player.set_tool_mode(ToolMode::Draw).await;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod compositor;
pub mod config;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod media;
pub mod overlay;
pub mod playback;
pub mod preview;

pub use error::{EncodeError, LoadError, PlayerError, SaveError, StreamError};
pub use frame::Frame;
pub use media::{FrameStream, MediaSource};
pub use overlay::AnnotationOverlay;
pub use playback::{ChannelSink, DisplaySink, PlaybackManager, PlayerEvent};
