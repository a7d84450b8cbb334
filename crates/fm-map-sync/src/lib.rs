//! # FM Map Sync
//!
//! Live fleet map engine: keeps a geospatial surface consistent with a
//! continuously changing roster of emergency units.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no backend calls
//!   - `LifecycleController`: `Uninitialized -> Ready | Degraded -> Disposed`
//!   - `ReadinessGate`: `NotReady`/`Ready` gate for overlay requests
//!   - `RosterDiff`: Keyed diff of a roster against live markers
//!   - `MarkerSpec`, `PopupContent`: Marker presentation
//!   - `OverlayLayer`, `DensitySource`: Heatmap definitions and data
//!   - `MapSyncConfig`, `MapSyncConfigBuilder`: Engine tuning with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MapSyncApi`: Driving port used by the host dashboard
//!   - `SurfaceFactory`, `RenderSurface`, `MarkerHandle`: Driven ports
//!     implemented by a rendering backend
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `MapSyncService`: Implements `MapSyncApi`
//!   - `MarkerReconciler`: Sole owner of the live marker registry
//!   - `OverlayManager`: Idempotent overlay creation behind the gate
//!   - `InteractionBridge`: Marker clicks to the selection callback
//!
//! - **Adapters Layer** (`adapters/`): Backends
//!   - `HeadlessSurfaceFactory`: Records every call into a `HeadlessScene`
//!
//! ## Invariants
//!
//! - At most one live marker per unit id
//! - While `Ready`, live marker ids equal the ids of the last reconciled
//!   roster, minus units skipped for invalid data
//! - A marker whose id left the roster is removed in the same pass
//! - Overlay creation is idempotent per layer id
//! - `Disposed` is terminal
//!
//! ## Usage Example
//!
//! ```ignore
//! use fleet_types::{Coordinates, MapConfig, Unit, UnitStatus};
//! use fm_map_sync::{HeadlessSurfaceFactory, MapSyncApi, MapSyncService};
//!
//! let mut service = MapSyncService::new(HeadlessSurfaceFactory::new());
//! service.set_on_select(|unit| println!("selected {:?}", unit.map(|u| u.id)));
//!
//! let config = MapConfig::new(Coordinates::new(-48.548, -27.594), 10.0)
//!     .with_env_credential();
//! service.initialize(config);
//! service.surface_ready();
//!
//! let roster = vec![Unit::new("ALFA-01", "ICU Alfa 01", UnitStatus::EnRoute).at(-48.55, -27.6)];
//! let report = service.reconcile(&roster);
//! assert_eq!(report.created, 1);
//!
//! service.dispose();
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{HeadlessScene, HeadlessSurface, HeadlessSurfaceFactory};
pub use domain::{
    DegradedReason, LifecycleController, MapSyncConfig, MapSyncConfigBuilder, ReadinessGate,
    SurfaceState,
};
pub use error::{MapSyncError, MapSyncResult};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{MapSyncApi, MarkerHandle, RenderSurface, SurfaceError, SurfaceFactory};
pub use service::{
    InteractionBridge, MapSyncService, OverlayOutcome, ReconcileReport, SkippedUnit,
};
