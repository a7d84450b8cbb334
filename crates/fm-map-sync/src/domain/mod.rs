//! Domain Layer - Pure map sync logic
//!
//! This layer contains:
//! - Surface lifecycle state machine
//! - Readiness gate for asynchronous surface load
//! - Keyed roster diff
//! - Marker presentation (appearance, popup)
//! - Overlay definitions and density data
//! - Configuration
//!
//! RULES:
//! - No rendering backend calls
//! - No async code
//! - Pure functions where possible

pub mod config;
pub mod diff;
pub mod lifecycle;
pub mod marker;
pub mod overlay;
pub mod readiness;

pub use config::{MapSyncConfig, MapSyncConfigBuilder};
pub use diff::RosterDiff;
pub use lifecycle::{
    check_credential, DegradedReason, LifecycleController, LifecycleEvent, SurfaceState,
};
pub use marker::{status_color, MarkerAppearance, MarkerSpec, PopupContent};
pub use overlay::{
    surface_id, ColorStop, DensitySource, HeatmapPaint, OverlayLayer, PaintParameters,
};
pub use readiness::{GateState, ReadinessGate};
