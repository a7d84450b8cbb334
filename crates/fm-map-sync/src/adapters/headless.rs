//! Headless Rendering Adapter
//!
//! Implements the surface ports without a display. Every backend call is
//! recorded into a shared [`HeadlessScene`] that tests and the replay runtime
//! can inspect, click on, and inject faults into.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fleet_types::{Coordinates, UnitId};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::debug;

use crate::domain::{DensitySource, MarkerAppearance, MarkerSpec, OverlayLayer, PopupContent};
use crate::ports::{
    ClickHandler, MapControl, MarkerHandle, RenderSurface, SurfaceError, SurfaceFactory,
    SurfaceOptions,
};

/// Recorded state of one marker element.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerRecord {
    pub unit_id: UnitId,
    pub coordinates: Coordinates,
    pub appearance: MarkerAppearance,
    pub popup: PopupContent,
    /// Mutations applied after creation
    pub mutations: u64,
}

#[derive(Default)]
struct SceneState {
    options: Option<SurfaceOptions>,
    markers: HashMap<u64, MarkerRecord>,
    /// Source id to the GeoJSON last pushed
    sources: HashMap<String, Value>,
    layers: HashMap<String, OverlayLayer>,
    controls: Vec<MapControl>,
    destroyed: bool,
    surfaces_created: usize,
    next_marker: u64,
    total_created: usize,
    total_removed: usize,
}

/// Inspectable record of everything drawn on headless surfaces.
#[derive(Clone, Default)]
pub struct HeadlessScene {
    state: Arc<RwLock<SceneState>>,
    handlers: Arc<Mutex<HashMap<u64, ClickHandler>>>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_marker_count(&self) -> usize {
        self.state.read().markers.len()
    }

    /// Number of live markers drawn for `unit_id`.
    pub fn markers_for(&self, unit_id: &str) -> usize {
        self.state
            .read()
            .markers
            .values()
            .filter(|m| m.unit_id.as_str() == unit_id)
            .count()
    }

    /// Ids of live markers, sorted.
    pub fn marker_ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self
            .state
            .read()
            .markers
            .values()
            .map(|m| m.unit_id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn marker(&self, unit_id: &str) -> Option<MarkerRecord> {
        self.state
            .read()
            .markers
            .values()
            .find(|m| m.unit_id.as_str() == unit_id)
            .cloned()
    }

    pub fn marker_position(&self, unit_id: &str) -> Option<Coordinates> {
        self.marker(unit_id).map(|m| m.coordinates)
    }

    /// Markers ever created.
    pub fn total_created(&self) -> usize {
        self.state.read().total_created
    }

    /// Markers ever removed.
    pub fn total_removed(&self) -> usize {
        self.state.read().total_removed
    }

    pub fn source_count(&self) -> usize {
        self.state.read().sources.len()
    }

    pub fn has_source(&self, id: &str) -> bool {
        self.state.read().sources.contains_key(id)
    }

    /// Point count of a source's current data.
    pub fn source_points(&self, id: &str) -> Option<usize> {
        self.state
            .read()
            .sources
            .get(id)
            .and_then(|data| data["features"].as_array().map(Vec::len))
    }

    /// GeoJSON currently held by a source.
    pub fn source_data(&self, id: &str) -> Option<Value> {
        self.state.read().sources.get(id).cloned()
    }

    pub fn layer_count(&self) -> usize {
        self.state.read().layers.len()
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.state.read().layers.contains_key(id)
    }

    pub fn layer(&self, id: &str) -> Option<OverlayLayer> {
        self.state.read().layers.get(id).cloned()
    }

    pub fn controls(&self) -> Vec<MapControl> {
        self.state.read().controls.clone()
    }

    /// Options of the most recently created surface.
    pub fn options(&self) -> Option<SurfaceOptions> {
        self.state.read().options.clone()
    }

    pub fn surfaces_created(&self) -> usize {
        self.state.read().surfaces_created
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.read().destroyed
    }

    /// Simulate a user click on the marker for `unit_id`.
    ///
    /// Returns whether a handler ran. The handler is invoked outside all
    /// locks.
    pub fn click(&self, unit_id: &str) -> bool {
        let key = {
            let state = self.state.read();
            state
                .markers
                .iter()
                .find(|(_, m)| m.unit_id.as_str() == unit_id)
                .map(|(key, _)| *key)
        };
        let Some(key) = key else {
            return false;
        };

        let Some(mut handler) = self.handlers.lock().remove(&key) else {
            return false;
        };
        handler();

        // Reinstall unless the marker went away during the callback
        if self.state.read().markers.contains_key(&key) {
            self.handlers.lock().entry(key).or_insert(handler);
        }
        true
    }
}

/// Backend refusals injected through the factory.
#[derive(Clone, Debug, Default)]
struct Faults {
    markers: HashSet<UnitId>,
    restyles: HashSet<UnitId>,
    layers: HashSet<String>,
}

/// Factory producing headless surfaces that share one scene.
#[derive(Clone, Default)]
pub struct HeadlessSurfaceFactory {
    scene: HeadlessScene,
    failure: Option<String>,
    faults: Faults,
}

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `create` fails with a backend error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Marker creation for `unit_id` is rejected by the backend.
    pub fn rejecting(mut self, unit_id: impl Into<UnitId>) -> Self {
        self.faults.markers.insert(unit_id.into());
        self
    }

    /// `set_appearance` on the marker for `unit_id` is rejected.
    pub fn rejecting_restyle(mut self, unit_id: impl Into<UnitId>) -> Self {
        self.faults.restyles.insert(unit_id.into());
        self
    }

    /// `add_layer` for the surface layer `layer_id` is rejected.
    pub fn rejecting_layer(mut self, layer_id: impl Into<String>) -> Self {
        self.faults.layers.insert(layer_id.into());
        self
    }

    pub fn scene(&self) -> HeadlessScene {
        self.scene.clone()
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    type Surface = HeadlessSurface;

    fn create(&self, options: &SurfaceOptions) -> Result<HeadlessSurface, SurfaceError> {
        if let Some(reason) = &self.failure {
            return Err(SurfaceError::Backend(reason.clone()));
        }

        {
            let mut state = self.scene.state.write();
            state.options = Some(options.clone());
            state.destroyed = false;
            state.surfaces_created += 1;
        }
        debug!(zoom = options.zoom, center = %options.center, "[HeadlessSurface] Created");

        Ok(HeadlessSurface {
            scene: self.scene.clone(),
            faults: self.faults.clone(),
        })
    }
}

/// A surface with no display attached.
pub struct HeadlessSurface {
    scene: HeadlessScene,
    faults: Faults,
}

impl HeadlessSurface {
    pub fn scene(&self) -> &HeadlessScene {
        &self.scene
    }

    fn ensure_live(&self) -> Result<(), SurfaceError> {
        if self.scene.state.read().destroyed {
            return Err(SurfaceError::Destroyed);
        }
        Ok(())
    }
}

impl RenderSurface for HeadlessSurface {
    type Marker = HeadlessMarker;

    fn create_marker(&mut self, spec: &MarkerSpec) -> Result<HeadlessMarker, SurfaceError> {
        self.ensure_live()?;
        if self.faults.markers.contains(&spec.unit_id) {
            return Err(SurfaceError::Backend(format!(
                "marker for {} rejected",
                spec.unit_id
            )));
        }
        if !spec.coordinates.is_valid() {
            return Err(SurfaceError::InvalidCoordinates(spec.coordinates));
        }

        let mut state = self.scene.state.write();
        let key = state.next_marker;
        state.next_marker += 1;
        state.total_created += 1;
        state.markers.insert(
            key,
            MarkerRecord {
                unit_id: spec.unit_id.clone(),
                coordinates: spec.coordinates,
                appearance: spec.appearance.clone(),
                popup: spec.popup.clone(),
                mutations: 0,
            },
        );

        Ok(HeadlessMarker {
            scene: self.scene.clone(),
            key,
            removed: false,
            reject_restyle: self.faults.restyles.contains(&spec.unit_id),
        })
    }

    fn has_source(&self, id: &str) -> bool {
        self.scene.has_source(id)
    }

    fn add_source(&mut self, id: &str, data: &DensitySource) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        let mut state = self.scene.state.write();
        if state.sources.contains_key(id) {
            return Err(SurfaceError::SourceExists(id.to_string()));
        }
        state.sources.insert(id.to_string(), data.to_geojson());
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: &DensitySource) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        let mut state = self.scene.state.write();
        match state.sources.get_mut(id) {
            Some(current) => {
                *current = data.to_geojson();
                Ok(())
            }
            None => Err(SurfaceError::UnknownSource(id.to_string())),
        }
    }

    fn remove_source(&mut self, id: &str) {
        self.scene.state.write().sources.remove(id);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.scene.has_layer(id)
    }

    fn add_layer(&mut self, layer: &OverlayLayer) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        if self.faults.layers.contains(&layer.id) {
            return Err(SurfaceError::Backend(format!("layer {} rejected", layer.id)));
        }
        let mut state = self.scene.state.write();
        if state.layers.contains_key(&layer.id) {
            return Err(SurfaceError::LayerExists(layer.id.clone()));
        }
        if !state.sources.contains_key(&layer.source_ref) {
            return Err(SurfaceError::UnknownSource(layer.source_ref.clone()));
        }
        state.layers.insert(layer.id.clone(), layer.clone());
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) {
        self.scene.state.write().layers.remove(id);
    }

    fn add_control(&mut self, control: MapControl) {
        self.scene.state.write().controls.push(control);
    }

    fn destroy(&mut self) {
        let mut state = self.scene.state.write();
        state.destroyed = true;
        state.controls.clear();
        debug!(
            markers = state.markers.len(),
            layers = state.layers.len(),
            "[HeadlessSurface] Destroyed"
        );
    }
}

/// Handle to one recorded marker.
pub struct HeadlessMarker {
    scene: HeadlessScene,
    key: u64,
    removed: bool,
    reject_restyle: bool,
}

impl HeadlessMarker {
    fn mutate(&mut self, apply: impl FnOnce(&mut MarkerRecord)) -> Result<(), SurfaceError> {
        let mut state = self.scene.state.write();
        if state.destroyed {
            return Err(SurfaceError::Destroyed);
        }
        match state.markers.get_mut(&self.key) {
            Some(record) if !self.removed => {
                apply(record);
                record.mutations += 1;
                Ok(())
            }
            _ => Err(SurfaceError::Backend("marker detached".to_string())),
        }
    }
}

impl MarkerHandle for HeadlessMarker {
    fn set_position(&mut self, coordinates: Coordinates) -> Result<(), SurfaceError> {
        if !coordinates.is_valid() {
            return Err(SurfaceError::InvalidCoordinates(coordinates));
        }
        self.mutate(|record| record.coordinates = coordinates)
    }

    fn set_appearance(&mut self, appearance: &MarkerAppearance) -> Result<(), SurfaceError> {
        if self.reject_restyle {
            return Err(SurfaceError::Backend("restyle rejected".to_string()));
        }
        self.mutate(|record| record.appearance = appearance.clone())
    }

    fn set_popup(&mut self, popup: &PopupContent) -> Result<(), SurfaceError> {
        self.mutate(|record| record.popup = popup.clone())
    }

    fn on_click(&mut self, handler: ClickHandler) {
        if !self.removed {
            self.scene.handlers.lock().insert(self.key, handler);
        }
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        self.scene.handlers.lock().remove(&self.key);
        let mut state = self.scene.state.write();
        if state.markers.remove(&self.key).is_some() {
            state.total_removed += 1;
        }
    }
}
