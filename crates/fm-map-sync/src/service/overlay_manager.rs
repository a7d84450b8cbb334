//! Overlay Manager
//!
//! Creates density layers at most once per layer id per surface lifetime and
//! refreshes their source data every pass. Requests made before the surface
//! signals ready are parked behind the [`ReadinessGate`] and applied when it
//! opens.

use std::collections::HashMap;

use fleet_types::{OverlayLayerSpec, Unit};
use tracing::{debug, info, warn};

use crate::domain::{DensitySource, MapSyncConfig, OverlayLayer, ReadinessGate};
use crate::error::{MapSyncError, MapSyncResult};
use crate::metrics::MetricsRecorder;
use crate::ports::{RenderSurface, SurfaceError};

/// What `ensure_overlay` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOutcome {
    /// Source and layer added to the surface
    Created,
    /// Layer already present; nothing added
    AlreadyPresent,
    /// Parked until the surface is ready
    Deferred,
    /// Kind is listed in the legend only
    LegendOnly,
    /// Surface is not accepting overlays (not ready, degraded, or disposed)
    Ignored,
}

pub struct OverlayManager {
    gate: ReadinessGate,
    tuning: MapSyncConfig,
    /// Specs waiting for the gate, in request order
    pending: Vec<OverlayLayerSpec>,
    /// Installed layers keyed by spec id
    installed: HashMap<String, OverlayLayer>,
    /// Density derived from the latest roster
    density: DensitySource,
}

impl OverlayManager {
    pub fn new(tuning: MapSyncConfig) -> Self {
        Self {
            gate: ReadinessGate::new(),
            tuning,
            pending: Vec::new(),
            installed: HashMap::new(),
            density: DensitySource::default(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_open()
    }

    /// Idempotently create the overlay for `spec`.
    pub fn ensure_overlay<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        spec: &OverlayLayerSpec,
        metrics: &dyn MetricsRecorder,
    ) -> MapSyncResult<OverlayOutcome> {
        let Some(layer) = OverlayLayer::from_spec(spec, &self.tuning) else {
            return Ok(OverlayOutcome::LegendOnly);
        };

        if self.installed.contains_key(&spec.id) {
            return Ok(OverlayOutcome::AlreadyPresent);
        }

        if !self.gate.is_open() {
            if !self.pending.iter().any(|p| p.id == spec.id) {
                debug!(layer_id = %spec.id, "[OverlayManager] Surface not ready, deferring");
                self.pending.push(spec.clone());
            }
            return Ok(OverlayOutcome::Deferred);
        }

        let outcome = self.install(surface, &layer, metrics)?;
        self.installed.insert(spec.id.clone(), layer);
        Ok(outcome)
    }

    fn install<S: RenderSurface>(
        &self,
        surface: &mut S,
        layer: &OverlayLayer,
        metrics: &dyn MetricsRecorder,
    ) -> MapSyncResult<OverlayOutcome> {
        let source_added = if surface.has_source(&layer.source_ref) {
            false
        } else {
            absorb_conflict(&layer.id, surface.add_source(&layer.source_ref, &self.density))?
        };
        if !source_added {
            // Source left over on the surface; bring its data current
            surface.set_source_data(&layer.source_ref, &self.density)?;
        }

        let layer_added = if surface.has_layer(&layer.id) {
            false
        } else {
            match absorb_conflict(&layer.id, surface.add_layer(layer)) {
                Ok(added) => added,
                Err(e) => {
                    // The layer is not tracked, so teardown would never see this source
                    if source_added {
                        surface.remove_source(&layer.source_ref);
                    }
                    return Err(e);
                }
            }
        };

        if layer_added {
            metrics.record_overlay_created();
            info!(
                layer_id = %layer.id,
                points = self.density.len(),
                "[OverlayManager] Overlay created"
            );
            Ok(OverlayOutcome::Created)
        } else {
            metrics.record_overlay_conflict();
            debug!(layer_id = %layer.id, "[OverlayManager] Layer already on surface");
            Ok(OverlayOutcome::AlreadyPresent)
        }
    }

    /// Open the gate and apply parked requests. Returns how many were applied.
    pub fn mark_ready<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        metrics: &dyn MetricsRecorder,
    ) -> usize {
        if !self.gate.open() {
            return 0;
        }

        let pending = std::mem::take(&mut self.pending);
        let mut applied = 0;
        for spec in &pending {
            match self.ensure_overlay(surface, spec, metrics) {
                Ok(_) => applied += 1,
                Err(e) => {
                    warn!(layer_id = %spec.id, error = %e, "[OverlayManager] Deferred overlay failed")
                }
            }
        }
        debug!(applied, "[OverlayManager] Readiness gate opened");
        applied
    }

    /// Recompute density from `roster` and push it to every installed source.
    pub fn refresh<S: RenderSurface>(&mut self, surface: &mut S, roster: &[Unit]) {
        self.density = DensitySource::from_roster(roster);
        if !self.gate.is_open() {
            return;
        }
        for layer in self.installed.values() {
            if let Err(e) = surface.set_source_data(&layer.source_ref, &self.density) {
                warn!(layer_id = %layer.id, error = %e, "[OverlayManager] Source refresh failed");
            }
        }
    }

    /// Remove every installed layer and source. Returns how many layers went.
    pub fn teardown<S: RenderSurface>(&mut self, surface: &mut S) -> usize {
        let count = self.installed.len();
        for (_, layer) in self.installed.drain() {
            surface.remove_layer(&layer.id);
            surface.remove_source(&layer.source_ref);
        }
        self.pending.clear();
        count
    }

    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn density(&self) -> &DensitySource {
        &self.density
    }
}

/// Map a backend "already exists" rejection to `Ok(false)`.
fn absorb_conflict(layer_id: &str, result: Result<(), SurfaceError>) -> MapSyncResult<bool> {
    let error = match result {
        Ok(()) => return Ok(true),
        Err(SurfaceError::SourceExists(_)) | Err(SurfaceError::LayerExists(_)) => {
            MapSyncError::OverlayConflict {
                layer_id: layer_id.to_string(),
            }
        }
        Err(e) => MapSyncError::Surface(e),
    };

    if error.is_benign() {
        debug!(error = %error, "[OverlayManager] Conflict absorbed");
        Ok(false)
    } else {
        Err(error)
    }
}
