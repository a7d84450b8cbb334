//! Outbound Ports (Driven Ports)
//!
//! Capabilities the map sync subsystem needs from a rendering backend. Any
//! engine (browser canvas, native mobile map, headless test double) plugs in
//! by implementing these traits.

use fleet_types::{Coordinates, MapConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    DensitySource, MapSyncConfig, MarkerAppearance, MarkerSpec, OverlayLayer, PopupContent,
};

/// Callback invoked by the backend when a marker element is clicked.
pub type ClickHandler = Box<dyn FnMut() + Send + 'static>;

/// Errors reported by a rendering backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("Backend rejected coordinates {0}")]
    InvalidCoordinates(Coordinates),

    #[error("Source already exists: {0}")]
    SourceExists(String),

    #[error("Layer already exists: {0}")]
    LayerExists(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Surface destroyed")]
    Destroyed,

    #[error("Backend error: {0}")]
    Backend(String),
}

/// UI controls attached to the surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapControl {
    Fullscreen,
    Navigation { visualize_pitch: bool },
}

/// Options used to construct a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceOptions {
    pub center: Coordinates,
    pub zoom: f64,
    pub style_url: String,
    pub credential: String,
    pub cooperative_gestures: bool,
    pub controls: Vec<MapControl>,
}

impl SurfaceOptions {
    /// `credential` must already have passed validation.
    pub fn from_config(config: &MapConfig, credential: &str, tuning: &MapSyncConfig) -> Self {
        let mut controls = Vec::with_capacity(2);
        if tuning.fullscreen_control {
            controls.push(MapControl::Fullscreen);
        }
        if tuning.navigation_control {
            controls.push(MapControl::Navigation {
                visualize_pitch: tuning.visualize_pitch,
            });
        }

        Self {
            center: config.center,
            zoom: config.zoom,
            style_url: tuning.style_url.clone(),
            credential: credential.to_string(),
            cooperative_gestures: tuning.cooperative_gestures,
            controls,
        }
    }
}

/// A marker owned by the reconciler (Driven Port)
///
/// The handle is exclusively owned: dropping it without `remove` leaves the
/// element on the surface, so owners must call `remove` on teardown.
pub trait MarkerHandle: Send {
    /// Move the marker in place.
    fn set_position(&mut self, coordinates: Coordinates) -> Result<(), SurfaceError>;

    /// Restyle the marker element in place.
    fn set_appearance(&mut self, appearance: &MarkerAppearance) -> Result<(), SurfaceError>;

    /// Replace popup content without closing an open popup.
    fn set_popup(&mut self, popup: &PopupContent) -> Result<(), SurfaceError>;

    /// Register the click handler. A later call replaces the earlier handler.
    fn on_click(&mut self, handler: ClickHandler);

    /// Detach the marker from the surface. Must be idempotent.
    fn remove(&mut self);
}

/// A live rendering surface (Driven Port)
pub trait RenderSurface: Send {
    type Marker: MarkerHandle;

    fn create_marker(&mut self, spec: &MarkerSpec) -> Result<Self::Marker, SurfaceError>;

    fn has_source(&self, id: &str) -> bool;

    fn add_source(&mut self, id: &str, data: &DensitySource) -> Result<(), SurfaceError>;

    /// Replace the data of an existing source.
    fn set_source_data(&mut self, id: &str, data: &DensitySource) -> Result<(), SurfaceError>;

    fn remove_source(&mut self, id: &str);

    fn has_layer(&self, id: &str) -> bool;

    /// Add a layer. Its `source_ref` must already exist.
    fn add_layer(&mut self, layer: &OverlayLayer) -> Result<(), SurfaceError>;

    fn remove_layer(&mut self, id: &str);

    fn add_control(&mut self, control: MapControl);

    /// Tear down the surface itself.
    fn destroy(&mut self);
}

/// Creates surfaces (Driven Port)
pub trait SurfaceFactory {
    type Surface: RenderSurface;

    fn create(&self, options: &SurfaceOptions) -> Result<Self::Surface, SurfaceError>;
}
