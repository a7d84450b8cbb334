//! Service Layer
//!
//! Application services that orchestrate domain logic and drive the
//! rendering backend through the outbound ports.

pub mod interaction;
pub mod map_sync_service;
pub mod overlay_manager;
pub mod reconciler;

pub use interaction::{InteractionBridge, SelectCallback};
pub use map_sync_service::MapSyncService;
pub use overlay_manager::{OverlayManager, OverlayOutcome};
pub use reconciler::{LiveMarker, MarkerReconciler, ReconcileReport, SkippedUnit};
