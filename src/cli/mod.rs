//! CLI module for the cropper
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::LogFormat;

pub mod args;
pub mod commands;

pub use args::{BoxSpecArgs, CropArgs, FrameArgs, InspectArgs, PlanArgs, PreviewArgs};

/// Video Cropper
///
/// Pick a crop rectangle on a video frame, preview it, and export the
/// cropped video with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "cropper")]
#[command(about = "Video Cropper - Crop videos to a rectangle or a social media aspect ratio")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error); overrides config and environment
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Configuration file (defaults to ./cropper.toml, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show duration and frame size of a video
    Inspect(args::InspectArgs),
    /// Extract a still frame
    Frame(args::FrameArgs),
    /// Compute a crop box without touching any video
    Plan(args::PlanArgs),
    /// Render a still of the cropped result
    Preview(args::PreviewArgs),
    /// Export the cropped video
    Crop(args::CropArgs),
    /// List the aspect ratio presets
    Presets,
}
