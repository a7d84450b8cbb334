//! Error types for the Map Sync subsystem

use fleet_types::UnitId;
use thiserror::Error;

use crate::domain::DegradedReason;
use crate::ports::SurfaceError;

/// Errors that can occur in the Map Sync subsystem
///
/// None of these abort a reconciliation pass. Per-unit errors are collected
/// into the pass report, configuration errors degrade the surface, and
/// overlay conflicts or post-dispose calls are absorbed as no-ops.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapSyncError {
    /// Credential or viewport rejected at initialization
    #[error("Configuration error ({reason}): {detail}")]
    Configuration {
        reason: DegradedReason,
        detail: String,
    },

    /// A marker could not be created for one unit
    #[error("Marker creation failed for unit {unit_id}: {reason}")]
    MarkerCreation { unit_id: UnitId, reason: String },

    /// An existing marker could not be brought up to date
    #[error("Marker update failed for unit {unit_id}: {reason}")]
    MarkerUpdate { unit_id: UnitId, reason: String },

    /// The roster listed the same unit id more than once
    #[error("Duplicate unit in roster: {unit_id}")]
    DuplicateUnit { unit_id: UnitId },

    /// Source or layer already exists on the surface
    #[error("Overlay already exists: {layer_id}")]
    OverlayConflict { layer_id: String },

    /// Operation attempted after the surface was disposed
    #[error("Surface disposed")]
    SurfaceDisposed,

    /// Operation attempted while the surface is not ready
    #[error("Surface not ready: {state}")]
    SurfaceNotReady { state: String },

    /// Invalid engine tuning parameters
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Rendering backend failure
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

impl MapSyncError {
    /// Whether the error is an expected condition that callers absorb silently.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            MapSyncError::OverlayConflict { .. }
                | MapSyncError::SurfaceDisposed
                | MapSyncError::SurfaceNotReady { .. }
        )
    }
}

/// Result type for map sync operations
pub type MapSyncResult<T> = Result<T, MapSyncError>;
