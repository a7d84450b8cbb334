//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for the hosting dashboard and roster feed
//! - Driven Ports (outbound) - Rendering backend capabilities

pub mod inbound;
pub mod outbound;

pub use inbound::MapSyncApi;
pub use outbound::{
    ClickHandler, MapControl, MarkerHandle, RenderSurface, SurfaceError, SurfaceFactory,
    SurfaceOptions,
};
