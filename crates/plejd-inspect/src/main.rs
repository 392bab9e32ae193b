//! Plejd Inspect - Main entry point
//!
//! Loads a mesh snapshot into the device registry, applies the state
//! notifications it carries, and prints what an integration would publish.

mod config;
mod state;

use anyhow::{bail, Context, Result};
use clap::Parser;
use plejd_core::MeshSnapshot;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::state::{AppState, RoomView};

#[derive(Parser, Debug)]
#[command(name = "plejd-inspect")]
#[command(about = "Inspect the device registry built from a Plejd mesh snapshot")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "plejd.toml")]
    config: PathBuf,

    /// Path to mesh snapshot (overrides the configured path)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Only show this room
    #[arg(short, long)]
    room: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

/// Everything printed in JSON mode
#[derive(Serialize)]
struct Report {
    summary: plejd_core::RegistrySummary,
    rooms: Vec<RoomView>,
    scenes: Vec<plejd_core::SceneDevice>,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.init_config {
        config::save_default_config(&args.config)?;
        println!("Wrote default configuration to {}", args.config.display());
        return Ok(());
    }

    let config = config::load_config(&args.config)?;

    // Initialize logging
    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.log.level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Plejd Inspect v{}", env!("CARGO_PKG_VERSION"));

    let snapshot_path = args
        .snapshot
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.snapshot.path));
    let snapshot = MeshSnapshot::from_file(&snapshot_path)
        .with_context(|| format!("Failed to load snapshot {}", snapshot_path.display()))?;

    info!(path = %snapshot_path.display(), "Snapshot loaded");

    let state = AppState::new(config).await;
    let report = state.ingest_snapshot(snapshot).await?;
    let applied = state.flush().await?;

    info!(
        outputs = report.outputs_registered,
        hidden = report.outputs_hidden,
        updates = applied,
        "Registry ready"
    );

    let rooms = match &args.room {
        Some(room_id) => match state.room(room_id).await {
            Some(room) => vec![room],
            None => bail!("Unknown room: {}", room_id),
        },
        None => state.rooms().await,
    };

    if args.json {
        let report = Report {
            summary: state.summary().await,
            rooms,
            scenes: state.scenes().await,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    {
        let registry = state.registry.read().await;
        match registry.get_api_site() {
            Some(site) => println!(
                "Site: {} ({}), crypto key: {}",
                site.site.title,
                site.site.site_id,
                if registry.crypto_key().is_some() { "set" } else { "missing" }
            ),
            None => println!("Site: not set"),
        }
    }

    for room in &rooms {
        println!("Room {}:", room.room_id);
        for output in &room.outputs {
            let onoff = if output.state { "on" } else { "off" };
            if output.dimmable {
                println!(
                    "  - {} ({}) at {} {} dim {}",
                    output.name, output.unique_id, output.ble_output_address, onoff, output.dim
                );
            } else {
                println!(
                    "  - {} ({}) at {} {}",
                    output.name, output.unique_id, output.ble_output_address, onoff
                );
            }
        }
    }

    if args.room.is_none() {
        let scenes = state.scenes().await;
        println!("Scenes: {}", scenes.len());
        for scene in scenes {
            println!("  - {} ({})", scene.name, scene.unique_id);
        }
    }

    Ok(())
}
