//! Markpad Command-Line Interface
//!
//! A headless CLI for inspecting media files and exporting annotated
//! frames, enabling scriptable workflows without requiring the GUI.

mod colors;
mod commands;
mod exit_codes;

use clap::{Parser, Subcommand};
use exit_codes::ExitCode;

/// Markpad - Media Annotation CLI
#[derive(Parser, Debug)]
#[command(name = "markpad")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect a media file (kind, dimensions, frame rate)
    Info {
        /// Path to an image or video file
        path: String,

        /// Also print a base64 JPEG thumbnail of the first frame
        #[arg(long)]
        preview: bool,
    },
    /// Composite a frame with its stroke annotations and save it
    Export {
        /// Path to an image or video file
        input: String,

        #[command(flatten)]
        options: ExportOptions,
    },
    /// Show version information
    Version,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOptions {
    /// Output file path: png, jpg, or bmp (default: timestamped file
    /// in the configured output directory)
    #[arg(short, long)]
    output: Option<String>,

    /// Stroke sidecar file (default: <input>.strokes.json if present)
    #[arg(short, long)]
    strokes: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("markpad=debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Build the async runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime");

    let exit_code = runtime.block_on(run(cli));
    std::process::exit(exit_code.as_i32());
}

async fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Commands::Info { path, preview } => {
            commands::info(&path, preview, cli.json, cli.quiet).await
        }
        Commands::Export { input, options } => {
            commands::export(&input, options, cli.json, cli.quiet).await
        }
        Commands::Version => {
            commands::version(cli.json);
            ExitCode::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    /// Verify the CLI definition is valid
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    /// Test parsing 'info' command
    #[test]
    fn parse_info() {
        let cli = Cli::try_parse_from(["markpad", "info", "clip.mp4"]).unwrap();
        assert!(!cli.json);
        assert!(!cli.quiet);
        assert!(!cli.verbose);
        match cli.command {
            Commands::Info { path, preview } => {
                assert_eq!(path, "clip.mp4");
                assert!(!preview);
            }
            _ => panic!("Expected Info command"),
        }
    }

    /// Test parsing 'info' command with --preview flag
    #[test]
    fn parse_info_with_preview() {
        let cli = Cli::try_parse_from(["markpad", "info", "photo.png", "--preview"]).unwrap();
        match cli.command {
            Commands::Info { preview, .. } => assert!(preview),
            _ => panic!("Expected Info command"),
        }
    }

    /// Test parsing info command with --json flag
    #[test]
    fn parse_info_with_json() {
        let cli = Cli::try_parse_from(["markpad", "--json", "info", "photo.png"]).unwrap();
        assert!(cli.json);
        assert!(!cli.quiet);
    }

    /// Test parsing 'export' command
    #[test]
    fn parse_export() {
        let cli = Cli::try_parse_from(["markpad", "export", "photo.png"]).unwrap();
        match cli.command {
            Commands::Export { input, options } => {
                assert_eq!(input, "photo.png");
                assert!(options.output.is_none());
                assert!(options.strokes.is_none());
            }
            _ => panic!("Expected Export command"),
        }
    }

    /// Test parsing export command with output and strokes options
    #[test]
    fn parse_export_with_options() {
        let cli = Cli::try_parse_from([
            "markpad",
            "export",
            "clip.mp4",
            "-o",
            "/tmp/annotated.jpg",
            "-s",
            "clip.strokes.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Export { options, .. } => {
                assert_eq!(options.output, Some("/tmp/annotated.jpg".to_string()));
                assert_eq!(options.strokes, Some("clip.strokes.json".to_string()));
            }
            _ => panic!("Expected Export command"),
        }
    }

    /// Test parsing 'version' command
    #[test]
    fn parse_version() {
        let cli = Cli::try_parse_from(["markpad", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    /// Test that global flags work after subcommand
    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["markpad", "info", "a.png", "--json", "-q"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
    }

    /// Test invalid command returns error
    #[test]
    fn parse_invalid_command() {
        let result = Cli::try_parse_from(["markpad", "invalid"]);
        assert!(result.is_err());
    }

    /// Test missing required argument returns error
    #[test]
    fn parse_missing_info_path() {
        let result = Cli::try_parse_from(["markpad", "info"]);
        assert!(result.is_err());
    }
}
