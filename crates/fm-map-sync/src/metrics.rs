//! Metrics hooks for map sync operations
//!
//! Counters for monitoring reconciliation churn, skipped units, overlay
//! setup, and selection traffic.
//!
//! ## Usage
//!
//! ```ignore
//! use fm_map_sync::metrics::{Metrics, MetricsRecorder};
//!
//! let metrics = Metrics::new();
//! metrics.record_pass();
//! metrics.record_marker_created();
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.markers_created, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Metrics collector for map sync operations
#[derive(Default)]
pub struct Metrics {
    /// Reconciliation passes applied to a ready surface
    pub passes: AtomicU64,
    /// Markers instantiated
    pub markers_created: AtomicU64,
    /// In-place position updates
    pub markers_moved: AtomicU64,
    /// In-place appearance updates (status change)
    pub markers_restyled: AtomicU64,
    /// Markers destroyed (roster removal or teardown)
    pub markers_removed: AtomicU64,
    /// Units skipped because of invalid data or backend rejection
    pub units_skipped: AtomicU64,
    /// Popup contents pushed to existing markers
    pub popups_refreshed: AtomicU64,
    /// Overlay layers created on a surface
    pub overlays_created: AtomicU64,
    /// Overlay creation attempts absorbed as no-ops
    pub overlay_conflicts: AtomicU64,
    /// Selection callbacks delivered
    pub selections_delivered: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            passes: self.passes.load(Ordering::Relaxed),
            markers_created: self.markers_created.load(Ordering::Relaxed),
            markers_moved: self.markers_moved.load(Ordering::Relaxed),
            markers_restyled: self.markers_restyled.load(Ordering::Relaxed),
            markers_removed: self.markers_removed.load(Ordering::Relaxed),
            units_skipped: self.units_skipped.load(Ordering::Relaxed),
            popups_refreshed: self.popups_refreshed.load(Ordering::Relaxed),
            overlays_created: self.overlays_created.load(Ordering::Relaxed),
            overlay_conflicts: self.overlay_conflicts.load(Ordering::Relaxed),
            selections_delivered: self.selections_delivered.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub passes: u64,
    pub markers_created: u64,
    pub markers_moved: u64,
    pub markers_restyled: u64,
    pub markers_removed: u64,
    pub units_skipped: u64,
    pub popups_refreshed: u64,
    pub overlays_created: u64,
    pub overlay_conflicts: u64,
    pub selections_delivered: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward map sync counters to an external
/// metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_pass(&self);
    fn record_marker_created(&self);
    fn record_marker_moved(&self);
    fn record_marker_restyled(&self);
    fn record_marker_removed(&self);
    fn record_unit_skipped(&self);
    fn record_popup_refreshed(&self);
    fn record_overlay_created(&self);
    fn record_overlay_conflict(&self);
    fn record_selection(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_pass(&self) {}
    fn record_marker_created(&self) {}
    fn record_marker_moved(&self) {}
    fn record_marker_restyled(&self) {}
    fn record_marker_removed(&self) {}
    fn record_unit_skipped(&self) {}
    fn record_popup_refreshed(&self) {}
    fn record_overlay_created(&self) {}
    fn record_overlay_conflict(&self) {}
    fn record_selection(&self) {}
}

impl MetricsRecorder for Metrics {
    fn record_pass(&self) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_marker_created(&self) {
        self.markers_created.fetch_add(1, Ordering::Relaxed);
    }

    fn record_marker_moved(&self) {
        self.markers_moved.fetch_add(1, Ordering::Relaxed);
    }

    fn record_marker_restyled(&self) {
        self.markers_restyled.fetch_add(1, Ordering::Relaxed);
    }

    fn record_marker_removed(&self) {
        self.markers_removed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_unit_skipped(&self) {
        self.units_skipped.fetch_add(1, Ordering::Relaxed);
    }

    fn record_popup_refreshed(&self) {
        self.popups_refreshed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_overlay_created(&self) {
        self.overlays_created.fetch_add(1, Ordering::Relaxed);
    }

    fn record_overlay_conflict(&self) {
        self.overlay_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    fn record_selection(&self) {
        self.selections_delivered.fetch_add(1, Ordering::Relaxed);
    }
}
