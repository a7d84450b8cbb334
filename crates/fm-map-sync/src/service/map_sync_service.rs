//! Map Sync Service
//!
//! Owns one surface instance and drives it through its lifecycle. The marker
//! registry and overlay manager live in a session that exists only between
//! a successful `initialize` and `dispose`.

use std::sync::Arc;

use fleet_types::{Coordinates, MapConfig, OverlayLayerSpec, Unit, UnitId};
use tracing::{debug, info, warn};

use crate::domain::{
    check_credential, DegradedReason, LifecycleController, LifecycleEvent, MapSyncConfig,
    SurfaceState,
};
use crate::error::{MapSyncError, MapSyncResult};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::ports::{MapSyncApi, RenderSurface, SurfaceFactory, SurfaceOptions};
use crate::service::interaction::{InteractionBridge, SelectCallback};
use crate::service::overlay_manager::{OverlayManager, OverlayOutcome};
use crate::service::reconciler::{MarkerReconciler, ReconcileReport};

/// Everything attached to a live surface.
struct Session<S: RenderSurface> {
    surface: S,
    reconciler: MarkerReconciler<S::Marker>,
    overlays: OverlayManager,
}

/// Live fleet map engine
pub struct MapSyncService<F: SurfaceFactory> {
    factory: F,
    tuning: MapSyncConfig,
    lifecycle: LifecycleController,
    session: Option<Session<F::Surface>>,
    bridge: InteractionBridge,
    metrics: Arc<Metrics>,
    /// Layers from the mount configuration plus any ensured later
    layers: Vec<OverlayLayerSpec>,
    /// Latest roster submitted but not yet reconciled
    pending_roster: Option<Vec<Unit>>,
}

impl<F: SurfaceFactory> MapSyncService<F> {
    /// Create a service with default tuning.
    pub fn new(factory: F) -> Self {
        let metrics = Arc::new(Metrics::new());
        Self {
            factory,
            tuning: MapSyncConfig::default(),
            lifecycle: LifecycleController::new(),
            session: None,
            bridge: InteractionBridge::new(metrics.clone()),
            metrics,
            layers: Vec::new(),
            pending_roster: None,
        }
    }

    /// Create a service with custom tuning.
    pub fn with_config(factory: F, tuning: MapSyncConfig) -> MapSyncResult<Self> {
        tuning.validate()?;
        let mut service = Self::new(factory);
        service.tuning = tuning;
        Ok(service)
    }

    /// Install the selection callback.
    pub fn set_on_select<C>(&self, callback: C)
    where
        C: Fn(Option<Unit>) + Send + Sync + 'static,
    {
        let callback: SelectCallback = Arc::new(callback);
        self.bridge.set_on_select(callback);
    }

    /// Deliver `None` to the selection callback.
    pub fn clear_selection(&self) -> bool {
        if self.lifecycle.state().is_disposed() {
            return false;
        }
        self.bridge.clear_selection()
    }

    /// Queue `roster` for the next `flush`, replacing anything still queued.
    pub fn submit_roster(&mut self, roster: Vec<Unit>) {
        if self.lifecycle.state().is_disposed() {
            debug!("[MapSyncService] Roster submitted after dispose, dropped");
            return;
        }
        if self.pending_roster.replace(roster).is_some() {
            debug!("[MapSyncService] Pending roster superseded");
        }
    }

    /// Reconcile the queued roster, if any.
    pub fn flush(&mut self) -> Option<ReconcileReport> {
        let roster = self.pending_roster.take()?;
        Some(self.reconcile(&roster))
    }

    pub fn has_pending_roster(&self) -> bool {
        self.pending_roster.is_some()
    }

    /// `(id, description)` of every configured layer, legend-only kinds
    /// included.
    pub fn legend(&self) -> Vec<(String, String)> {
        self.layers
            .iter()
            .map(|l| (l.id.clone(), l.description.clone()))
            .collect()
    }

    /// Ids with a live marker, sorted.
    pub fn live_marker_ids(&self) -> Vec<UnitId> {
        self.session
            .as_ref()
            .map(|s| s.reconciler.ids())
            .unwrap_or_default()
    }

    pub fn marker_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.reconciler.len())
    }

    pub fn marker_position(&self, unit_id: &UnitId) -> Option<Coordinates> {
        self.session.as_ref()?.reconciler.position(unit_id)
    }

    pub fn overlay_count(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |s| s.overlays.installed_count())
    }

    pub fn overlays_ready(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.overlays.is_ready())
    }

    pub fn surface(&self) -> Option<&F::Surface> {
        self.session.as_ref().map(|s| &s.surface)
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn remember_layer(&mut self, spec: &OverlayLayerSpec) {
        if !self.layers.iter().any(|l| l.id == spec.id) {
            self.layers.push(spec.clone());
        }
    }

    /// Why the surface is not taking work right now.
    fn not_accepting(&self) -> MapSyncError {
        match self.lifecycle.state() {
            SurfaceState::Disposed => MapSyncError::SurfaceDisposed,
            state => MapSyncError::SurfaceNotReady {
                state: state.to_string(),
            },
        }
    }

    fn degrade(&mut self, reason: DegradedReason, detail: String) -> SurfaceState {
        let error = MapSyncError::Configuration { reason, detail };
        warn!(reason = %reason, error = %error, "[MapSyncService] Surface degraded");
        self.lifecycle
            .process_event(LifecycleEvent::InitFailed(reason))
    }
}

impl<F: SurfaceFactory> MapSyncApi for MapSyncService<F> {
    fn initialize(&mut self, config: MapConfig) -> SurfaceState {
        if !self.lifecycle.accepts_init() {
            self.lifecycle.note_redundant_init();
            debug!(state = %self.lifecycle.state(), "[MapSyncService] Initialize ignored");
            return self.lifecycle.state();
        }

        for spec in &config.layers {
            self.remember_layer(spec);
        }
        // Includes layers requested before initialize
        let layers = self.layers.clone();

        let credential = match check_credential(config.credential.as_deref()) {
            Ok(credential) => credential.to_string(),
            Err(reason) => return self.degrade(reason, "map credential rejected".to_string()),
        };

        if let Err(e) = config.validate_view() {
            return self.degrade(DegradedReason::InvalidConfig, e.to_string());
        }

        let options = SurfaceOptions::from_config(&config, &credential, &self.tuning);
        let mut surface = match self.factory.create(&options) {
            Ok(surface) => surface,
            Err(e) => return self.degrade(DegradedReason::SurfaceUnavailable, e.to_string()),
        };

        for control in &options.controls {
            surface.add_control(control.clone());
        }

        // Configured heatmaps wait behind the readiness gate
        let mut overlays = OverlayManager::new(self.tuning.clone());
        for spec in &layers {
            if let Err(e) = overlays.ensure_overlay(&mut surface, spec, &*self.metrics) {
                warn!(layer_id = %spec.id, error = %e, "[MapSyncService] Layer not queued");
            }
        }

        self.session = Some(Session {
            surface,
            reconciler: MarkerReconciler::new(self.bridge.clone(), self.tuning.popup_offset_px),
            overlays,
        });

        let state = self.lifecycle.process_event(LifecycleEvent::SurfaceCreated);
        info!(
            center = %config.center,
            zoom = config.zoom,
            layers = config.layers.len(),
            "[MapSyncService] Surface ready for markers"
        );
        state
    }

    fn surface_ready(&mut self) {
        if !self.lifecycle.state().is_ready() {
            debug!(error = %self.not_accepting(), "[MapSyncService] Ready signal ignored");
            return;
        }
        if let Some(session) = self.session.as_mut() {
            let applied = session
                .overlays
                .mark_ready(&mut session.surface, &*self.metrics);
            info!(applied, "[MapSyncService] Surface loaded, overlays applied");
        }
    }

    fn reconcile(&mut self, roster: &[Unit]) -> ReconcileReport {
        if !self.lifecycle.state().is_ready() {
            debug!(error = %self.not_accepting(), "[MapSyncService] Reconcile ignored");
            return ReconcileReport::default();
        }
        let Some(session) = self.session.as_mut() else {
            return ReconcileReport::default();
        };

        // A direct pass supersedes anything still queued
        self.pending_roster = None;
        self.bridge.sync_roster(roster);

        let report =
            session
                .reconciler
                .reconcile(&mut session.surface, roster, &*self.metrics);
        session.overlays.refresh(&mut session.surface, roster);

        info!(
            units = roster.len(),
            created = report.created,
            moved = report.moved,
            removed = report.removed,
            skipped = report.skipped.len(),
            live = session.reconciler.len(),
            "[MapSyncService] Reconciled roster"
        );
        report
    }

    fn ensure_overlay(&mut self, spec: &OverlayLayerSpec) -> MapSyncResult<OverlayOutcome> {
        let state = self.lifecycle.state();
        if state == SurfaceState::Uninitialized {
            // Queued with the configured layers once the surface exists
            self.remember_layer(spec);
            debug!(layer_id = %spec.id, "[MapSyncService] Overlay requested before initialize");
            return Ok(OverlayOutcome::Deferred);
        }
        if !state.is_ready() {
            let error = self.not_accepting();
            debug!(layer_id = %spec.id, error = %error, "[MapSyncService] Overlay request ignored");
            return Ok(OverlayOutcome::Ignored);
        }
        self.remember_layer(spec);

        let Some(session) = self.session.as_mut() else {
            return Ok(OverlayOutcome::Ignored);
        };
        session
            .overlays
            .ensure_overlay(&mut session.surface, spec, &*self.metrics)
    }

    fn on_unit_clicked(&self, unit_id: &UnitId) -> bool {
        if self.lifecycle.state().is_disposed() {
            debug!(unit_id = %unit_id, error = %MapSyncError::SurfaceDisposed, "[MapSyncService] Click ignored");
            return false;
        }
        self.bridge.on_unit_clicked(unit_id)
    }

    fn dispose(&mut self) {
        let previous = self.lifecycle.state();
        self.lifecycle.process_event(LifecycleEvent::DisposeRequested);

        if self.pending_roster.take().is_some() {
            debug!("[MapSyncService] Pending roster discarded on dispose");
        }

        if let Some(mut session) = self.session.take() {
            let markers = session.reconciler.clear();
            let overlays = session.overlays.teardown(&mut session.surface);
            session.surface.destroy();
            info!(markers, overlays, "[MapSyncService] Surface disposed");
        } else if !previous.is_disposed() {
            info!(state = %previous, "[MapSyncService] Disposed without a surface");
        }

        self.bridge.detach();
    }

    fn state(&self) -> SurfaceState {
        self.lifecycle.state()
    }
}

impl<F: SurfaceFactory> Drop for MapSyncService<F> {
    fn drop(&mut self) {
        if self.session.is_some() {
            self.dispose();
        }
    }
}
