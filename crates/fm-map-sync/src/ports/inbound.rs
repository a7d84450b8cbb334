//! Inbound Ports (Driving Ports)
//!
//! The API the hosting dashboard and the roster feed use to drive the map.

use fleet_types::{MapConfig, OverlayLayerSpec, Unit, UnitId};

use crate::domain::SurfaceState;
use crate::error::MapSyncResult;
use crate::service::{OverlayOutcome, ReconcileReport};

/// Primary map sync API (Driving Port)
///
/// All methods run synchronously on the caller's dispatch; `&mut self`
/// serializes reconciliation passes.
pub trait MapSyncApi {
    /// Create the surface. Ignored unless the surface is `Uninitialized`.
    fn initialize(&mut self, config: MapConfig) -> SurfaceState;

    /// Signal that the backend finished loading and accepts sources/layers.
    fn surface_ready(&mut self);

    /// Converge live markers to `roster`. No-op unless `Ready`.
    fn reconcile(&mut self, roster: &[Unit]) -> ReconcileReport;

    /// Idempotently create the overlay for `spec`.
    fn ensure_overlay(&mut self, spec: &OverlayLayerSpec) -> MapSyncResult<OverlayOutcome>;

    /// Forward a marker click. Returns whether a selection was delivered.
    fn on_unit_clicked(&self, unit_id: &UnitId) -> bool;

    /// Tear down markers, overlays, and the surface. Idempotent.
    fn dispose(&mut self);

    fn state(&self) -> SurfaceState;
}
