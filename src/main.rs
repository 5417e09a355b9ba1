// StreamTune - Terminal Audio Streamer
// Search a song, hear it; queue a few, shuffle them; keys control playback live

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use streamtune::{audio::MpvPlayer, cli::App, config::Config, logging::init_logging};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "streamtune")]
#[command(about = "Stream and control music from the terminal")]
#[command(version)]
struct Args {
    /// Enable developer logging (stderr + debug output)
    #[arg(long)]
    dev: bool,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load config - falls back to defaults if missing
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Flushes the log file when main returns
    let _log_guard = init_logging(&config.storage.data_dir.join("logs"), args.dev)?;
    info!("StreamTune starting (data dir {})", config.storage.data_dir.display());

    if !MpvPlayer::is_available(&config.player.binary) {
        warn!("Player binary '{}' not found", config.player.binary);
        eprintln!(
            "⚠️  '{}' was not found. Install mpv or set player.binary in the config.",
            config.player.binary
        );
    }
    if config.resolver.effective_api_key().is_none() {
        eprintln!("⚠️  YOUTUBE_API_KEY not set; searches will fail");
    }

    let mut app = App::new(config);
    app.run().await?;

    info!("StreamTune exiting");
    Ok(())
}
