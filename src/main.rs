//! Loopdeck headless harness.
//!
//! Runs the overlay engine against a live backend and logs every observable
//! state change. Stands in for the presentation layer during development
//! and when diagnosing reconciliation behavior against a real backend.

use std::{error::Error, path::PathBuf};

use clap::Parser;
use futures::StreamExt;
use tracing::info;

use loopdeck::config::Config;
use loopdeck::services::overlay::{HostEvent, OverlayService};
use loopdeck::tracing_config;

#[derive(Debug, Parser)]
#[command(name = "loopdeck", about = "Overlay engine harness")]
struct Cli {
    /// Path to a config file; defaults to the XDG location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the backend base URL from the config.
    #[arg(long)]
    base_url: Option<String>,

    /// Also write logs to the loopdeck log directory.
    #[arg(long)]
    log_file: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.log_file {
        tracing_config::init_with_file()?;
    } else {
        tracing_config::init()?;
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }

    info!(base_url = %config.backend.base_url, "loopdeck harness starting");

    let (service, mut host_events) = OverlayService::start((&config).into()).await?;

    spawn_state_loggers(&service);

    tokio::spawn(async move {
        while let Some(event) = host_events.recv().await {
            match event {
                HostEvent::BringToFront => info!("host: bring window to front"),
                HostEvent::ModeChanged(mode) => info!(?mode, "host: presentation mode changed"),
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    Ok(())
}

/// Log every change on the externally observable state streams.
fn spawn_state_loggers(service: &OverlayService) {
    let title = service.playback.title.watch();
    let artist = service.playback.artist.clone();
    tokio::spawn(async move {
        tokio::pin!(title);
        while let Some(title) = title.next().await {
            info!(%title, artist = %artist.get(), "track");
        }
    });

    let is_playing = service.playback.is_playing.watch();
    tokio::spawn(async move {
        tokio::pin!(is_playing);
        while let Some(playing) = is_playing.next().await {
            info!(playing, "playback");
        }
    });

    let volume = service.playback.volume.watch();
    tokio::spawn(async move {
        tokio::pin!(volume);
        while let Some(volume) = volume.next().await {
            info!(volume, "volume");
        }
    });

    let loop_config = service.playback.loop_config.watch();
    let loops_done = service.playback.loops_done.clone();
    tokio::spawn(async move {
        tokio::pin!(loop_config);
        while let Some(config) = loop_config.next().await {
            info!(
                mode = %config.mode,
                remaining = %config.remaining_label(loops_done.get()),
                "loop"
            );
        }
    });

    let connected = service.connected.watch();
    tokio::spawn(async move {
        tokio::pin!(connected);
        while let Some(connected) = connected.next().await {
            info!(connected, "backend connectivity");
        }
    });

    let last_error = service.last_error.watch();
    tokio::spawn(async move {
        tokio::pin!(last_error);
        while let Some(error) = last_error.next().await {
            if let Some(error) = error {
                info!(%error, "surfaced error");
            }
        }
    });
}
