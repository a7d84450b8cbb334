//! # Fleet Runtime
//!
//! Replays a recorded session through the map sync engine.
//!
//! ## Replay Sequence
//!
//! 1. Load the map configuration (JSON) and fill the credential from
//!    `FM_MAP_TOKEN` when the file carries none
//! 2. Initialize the engine on the headless backend
//! 3. Signal surface ready (unless `--no-ready` is given)
//! 4. Submit and flush every roster snapshot in file name order, pausing
//!    `interval` between snapshots (Ctrl-C stops the replay early)
//! 5. Optionally click a unit to exercise selection
//! 6. Dispose and report

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use fleet_telemetry::{log_event, log_unit_event};
use fleet_types::{roster_from_json, MapConfig, Unit, UnitId};
use fm_map_sync::{
    HeadlessSurfaceFactory, MapSyncApi, MapSyncConfig, MapSyncService, MetricsSnapshot,
    ReconcileReport, SurfaceState,
};
use parking_lot::Mutex;
use serde::Serialize;

const SUBSYSTEM: &str = "fleet-runtime";

/// What to replay.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub config_path: PathBuf,
    pub roster_dir: PathBuf,
    /// Withhold the surface-ready signal, leaving overlays deferred
    pub skip_ready: bool,
    /// Unit to click after the last snapshot
    pub select: Option<UnitId>,
    /// Pause between snapshots, zero to replay back to back
    pub interval: Duration,
    pub tuning: MapSyncConfig,
}

/// One reconciled snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub file: String,
    pub units: usize,
    pub created: usize,
    pub moved: usize,
    pub removed: usize,
    pub skipped: Vec<String>,
    pub live_markers: usize,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub state: String,
    pub passes: Vec<PassSummary>,
    pub overlays: usize,
    pub legend: Vec<(String, String)>,
    pub selection: Option<Option<Unit>>,
    /// Replay stopped on Ctrl-C before the last snapshot
    pub interrupted: bool,
    pub markers_after_dispose: usize,
    pub metrics: MetricsSnapshot,
}

/// Load and decode a map configuration file.
pub fn load_map_config(path: &Path) -> Result<MapConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading map config {}", path.display()))?;
    let config = MapConfig::from_json(&json)
        .with_context(|| format!("decoding map config {}", path.display()))?;
    Ok(config.with_env_credential())
}

/// `*.json` files in `dir`, sorted by file name.
pub fn roster_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing roster directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn load_roster(path: &Path) -> Result<Vec<Unit>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading roster {}", path.display()))?;
    roster_from_json(&json).with_context(|| format!("decoding roster {}", path.display()))
}

fn summarize(file: &Path, units: usize, report: &ReconcileReport, live: usize) -> PassSummary {
    PassSummary {
        file: file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        units,
        created: report.created,
        moved: report.moved,
        removed: report.removed,
        skipped: report
            .skipped
            .iter()
            .map(|s| s.unit_id.to_string())
            .collect(),
        live_markers: live,
    }
}

/// Run a full replay on the headless backend.
pub async fn replay(options: &ReplayOptions) -> Result<ReplaySummary> {
    let config = load_map_config(&options.config_path)?;
    let files = roster_files(&options.roster_dir)?;

    let factory = HeadlessSurfaceFactory::new();
    let scene = factory.scene();
    let mut service = MapSyncService::with_config(factory, options.tuning.clone())
        .context("invalid engine tuning")?;

    let selection: Arc<Mutex<Option<Option<Unit>>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&selection);
    service.set_on_select(move |unit| *sink.lock() = Some(unit));

    let state = service.initialize(config);
    log_event!(info, SUBSYSTEM, "Engine initialized", state = %state);
    if let SurfaceState::Degraded(reason) = state {
        log_event!(warn, SUBSYSTEM, "Map unavailable, host would render fallback", reason = %reason);
    } else if !options.skip_ready {
        service.surface_ready();
    }

    let mut passes = Vec::with_capacity(files.len());
    let mut interrupted = false;
    for (index, file) in files.iter().enumerate() {
        if index > 0 && !options.interval.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(options.interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    log_event!(info, SUBSYSTEM, "Interrupted, disposing", remaining = files.len() - index);
                    interrupted = true;
                    break;
                }
            }
        }
        let roster = load_roster(file)?;
        let units = roster.len();
        service.submit_roster(roster);
        let Some(report) = service.flush() else {
            continue;
        };
        for skipped in &report.skipped {
            log_unit_event!(warn, SUBSYSTEM, "Unit skipped", skipped.unit_id, reason = %skipped.reason);
        }
        let pass = summarize(file, units, &report, service.marker_count());
        log_event!(
            info,
            SUBSYSTEM,
            "Snapshot replayed",
            file = %pass.file,
            applied = report.applied,
            created = pass.created,
            moved = pass.moved,
            removed = pass.removed,
            live = pass.live_markers
        );
        passes.push(pass);
    }

    if let Some(unit_id) = &options.select {
        if !scene.click(unit_id.as_str()) {
            log_unit_event!(warn, SUBSYSTEM, "No marker to click", unit_id);
        }
    }

    let overlays = service.overlay_count();
    let legend = service.legend();
    let final_state = service.state();
    service.dispose();

    let summary = ReplaySummary {
        state: final_state.to_string(),
        passes,
        overlays,
        legend,
        selection: selection.lock().clone(),
        interrupted,
        markers_after_dispose: scene.live_marker_count(),
        metrics: service.metrics(),
    };
    log_event!(
        info,
        SUBSYSTEM,
        "Replay complete",
        passes = summary.passes.len(),
        state = %summary.state
    );
    Ok(summary)
}
