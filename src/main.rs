//! Video Cropper
//!
//! Crop a video to a rectangle picked on a letterboxed frame preview, or to
//! one of the social media aspect ratio presets.
//!
//! # Usage
//!
//! ```bash
//! cropper inspect --input holiday.mp4
//! cropper plan --width 1920 --height 1080 --preset tiktok
//! cropper preview --input holiday.mp4 --drag 100,50,400,300
//! cropper crop --input holiday.mp4 --preset youtube --output holiday_16x9.mp4
//! cropper crop --input holiday.mp4 --box 0,0,1080,1080 --in-place
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use cropper_cli::adapters::{tracing_log, TomlConfigAdapter};
use cropper_cli::app::container::DefaultAppContainer;
use cropper_cli::cli::{commands, Cli, Commands};
use cropper_cli::config_initialization::initialize_configuration;
use cropper_cli::ports::{AppConfig, ConfigPort};

/// Main entry point for the cropper CLI
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_port = TomlConfigAdapter::new()?;
    let config = initialize_configuration(&config_port, &cli)?;

    // Initialize logging
    tracing_log::init_tracing(config.log_level, cli.log_level.is_some(), cli.log_format)?;
    if let Some(path) = config_port.config_file_path() {
        info!("Loaded configuration from {}", path.display());
    }

    let result = run(cli.command, &config).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn run(command: Commands, config: &AppConfig) -> Result<()> {
    let container = DefaultAppContainer::new(config)?;

    // Execute the requested command
    match command {
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(&container, args).await
        }
        Commands::Frame(args) => {
            info!("Executing frame command");
            commands::frame(&container, args).await
        }
        Commands::Plan(args) => {
            info!("Executing plan command");
            commands::plan(config, args)
        }
        Commands::Preview(args) => {
            info!("Executing preview command");
            commands::preview(&container, config, args).await
        }
        Commands::Crop(args) => {
            info!("Executing crop command");
            commands::crop(&container, config, args).await
        }
        Commands::Presets => {
            commands::presets();
            Ok(())
        }
    }
}
