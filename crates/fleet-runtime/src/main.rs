//! Fleet Runtime: replay roster snapshots through the live map engine.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use fleet_runtime::{replay, ReplayOptions};
use fleet_telemetry::{init_telemetry, TelemetryConfig};
use fleet_types::UnitId;
use fm_map_sync::MapSyncConfigBuilder;

/// Fleet Runtime: headless replay of the live fleet map
#[derive(Parser, Debug)]
#[command(name = "fleet-runtime")]
#[command(about = "Replay recorded roster snapshots through the map sync engine")]
struct Args {
    /// Map configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Directory of roster snapshots (*.json), replayed in file name order
    #[arg(short, long)]
    rosters: PathBuf,

    /// Unit to click after the last snapshot
    #[arg(long)]
    select: Option<String>,

    /// Pause between snapshots in milliseconds, to watch a replay at feed pace
    #[arg(long, default_value = "0")]
    interval_ms: u64,

    /// Never signal surface ready; overlays stay deferred
    #[arg(long)]
    no_ready: bool,

    /// Heatmap kernel radius in pixels
    #[arg(long, default_value = "40")]
    heatmap_radius: f64,

    /// Log level override (falls back to FM_LOG_LEVEL / RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the replay summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::for_component("runtime");
    if let Some(level) = &args.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    let _guard = init_telemetry(telemetry).context("initializing telemetry")?;

    let tuning = MapSyncConfigBuilder::new()
        .heatmap_radius(args.heatmap_radius)
        .build()
        .context("invalid engine tuning")?;

    let options = ReplayOptions {
        config_path: args.config,
        roster_dir: args.rosters,
        skip_ready: args.no_ready,
        select: args.select.map(UnitId::from),
        interval: Duration::from_millis(args.interval_ms),
        tuning,
    };

    let summary = replay(&options).await?;
    info!(
        passes = summary.passes.len(),
        overlays = summary.overlays,
        markers_after_dispose = summary.markers_after_dispose,
        interrupted = summary.interrupted,
        "Replay finished"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("encoding summary")?;
        println!("{}", json);
    }

    Ok(())
}
