//! Marker Reconciler
//!
//! Sole owner of the live marker registry. Each pass diffs the roster against
//! the registry and applies three phases:
//!
//! 1. create markers for ids seen for the first time
//! 2. update markers in place for ids already live
//! 3. remove markers whose id left the roster
//!
//! A unit that cannot be applied is skipped and reported; the pass always
//! completes.

use std::collections::HashMap;

use fleet_types::{Coordinates, Unit, UnitId};
use tracing::{debug, warn};

use crate::domain::{MarkerAppearance, MarkerSpec, PopupContent, RosterDiff};
use crate::error::MapSyncError;
use crate::metrics::MetricsRecorder;
use crate::ports::{MarkerHandle, RenderSurface};
use crate::service::interaction::InteractionBridge;

/// On-surface proxy for one unit.
pub struct LiveMarker<M> {
    pub unit_id: UnitId,
    handle: M,
    pub coordinates: Coordinates,
    pub appearance: MarkerAppearance,
    pub popup: PopupContent,
}

impl<M> LiveMarker<M> {
    pub fn handle(&self) -> &M {
        &self.handle
    }
}

/// A unit left out of a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedUnit {
    pub unit_id: UnitId,
    pub reason: MapSyncError,
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// False when the pass was ignored because the surface is not `Ready`
    pub applied: bool,
    pub created: usize,
    pub moved: usize,
    pub restyled: usize,
    pub popups_refreshed: usize,
    pub removed: usize,
    /// Live markers left untouched
    pub unchanged: usize,
    pub skipped: Vec<SkippedUnit>,
    /// Repeated roster entries ignored in favour of the first occurrence
    pub duplicates: Vec<UnitId>,
}

impl ReconcileReport {
    pub fn skipped_ids(&self) -> Vec<UnitId> {
        self.skipped.iter().map(|s| s.unit_id.clone()).collect()
    }

    /// True if the pass changed nothing on the surface.
    pub fn is_noop(&self) -> bool {
        self.created == 0
            && self.moved == 0
            && self.restyled == 0
            && self.popups_refreshed == 0
            && self.removed == 0
    }
}

/// Keyed-diff engine over the live marker registry.
pub struct MarkerReconciler<M: MarkerHandle> {
    markers: HashMap<UnitId, LiveMarker<M>>,
    bridge: InteractionBridge,
    popup_offset_px: u16,
}

impl<M: MarkerHandle> MarkerReconciler<M> {
    pub fn new(bridge: InteractionBridge, popup_offset_px: u16) -> Self {
        Self {
            markers: HashMap::new(),
            bridge,
            popup_offset_px,
        }
    }

    /// Converge the registry to `roster`.
    pub fn reconcile<S>(
        &mut self,
        surface: &mut S,
        roster: &[Unit],
        metrics: &dyn MetricsRecorder,
    ) -> ReconcileReport
    where
        S: RenderSurface<Marker = M>,
    {
        let diff = RosterDiff::compute(&self.markers, roster);
        let mut report = ReconcileReport {
            applied: true,
            ..Default::default()
        };

        for unit in &diff.duplicates {
            let error = MapSyncError::DuplicateUnit {
                unit_id: unit.id.clone(),
            };
            debug!(error = %error, "[MarkerReconciler] Duplicate roster entry ignored");
            report.duplicates.push(unit.id.clone());
        }

        for unit in diff.to_create {
            if let Err(reason) = self.create(surface, unit) {
                skip(&mut report, metrics, &unit.id, reason);
                continue;
            }
            report.created += 1;
            metrics.record_marker_created();
        }

        for unit in diff.to_update {
            if let Err(reason) = self.update(unit, &mut report, metrics) {
                skip(&mut report, metrics, &unit.id, reason);
            }
        }

        for unit_id in diff.to_remove {
            if let Some(mut marker) = self.markers.remove(&unit_id) {
                marker.handle.remove();
                report.removed += 1;
                metrics.record_marker_removed();
                debug!(unit_id = %unit_id, "[MarkerReconciler] Marker removed");
            }
        }

        metrics.record_pass();
        report
    }

    fn create<S>(&mut self, surface: &mut S, unit: &Unit) -> Result<(), MapSyncError>
    where
        S: RenderSurface<Marker = M>,
    {
        let creation_error = |reason: String| MapSyncError::MarkerCreation {
            unit_id: unit.id.clone(),
            reason,
        };

        let coordinates = unit.position().map_err(|e| creation_error(e.to_string()))?;
        let spec = MarkerSpec::for_unit(unit, coordinates, self.popup_offset_px);
        let mut handle = surface
            .create_marker(&spec)
            .map_err(|e| creation_error(e.to_string()))?;
        handle.on_click(self.bridge.click_handler(unit.id.clone()));

        debug!(unit_id = %unit.id, %coordinates, "[MarkerReconciler] Marker created");
        self.markers.insert(
            unit.id.clone(),
            LiveMarker {
                unit_id: unit.id.clone(),
                handle,
                coordinates,
                appearance: spec.appearance,
                popup: spec.popup,
            },
        );
        Ok(())
    }

    /// Mutate a live marker in place. Position, appearance, and popup are
    /// independent steps; each is pushed only if it differs, and a failed
    /// step does not stop the others.
    fn update(
        &mut self,
        unit: &Unit,
        report: &mut ReconcileReport,
        metrics: &dyn MetricsRecorder,
    ) -> Result<(), MapSyncError> {
        let popup_offset_px = self.popup_offset_px;
        let Some(marker) = self.markers.get_mut(&unit.id) else {
            return Ok(());
        };
        let mut failures: Vec<String> = Vec::new();
        let mut touched = false;

        // An invalid fix leaves the marker at its last good position
        match unit.position() {
            Ok(coordinates) if coordinates != marker.coordinates => {
                match marker.handle.set_position(coordinates) {
                    Ok(()) => {
                        marker.coordinates = coordinates;
                        report.moved += 1;
                        metrics.record_marker_moved();
                        touched = true;
                    }
                    Err(e) => failures.push(format!("position: {}", e)),
                }
            }
            Ok(_) => {}
            Err(e) => failures.push(format!("position: {}", e)),
        }

        let appearance = MarkerAppearance::for_unit(unit);
        if appearance != marker.appearance {
            match marker.handle.set_appearance(&appearance) {
                Ok(()) => {
                    marker.appearance = appearance;
                    report.restyled += 1;
                    metrics.record_marker_restyled();
                    touched = true;
                }
                Err(e) => failures.push(format!("appearance: {}", e)),
            }
        }

        let popup = PopupContent::for_unit(unit, popup_offset_px);
        if popup != marker.popup {
            match marker.handle.set_popup(&popup) {
                Ok(()) => {
                    marker.popup = popup;
                    report.popups_refreshed += 1;
                    metrics.record_popup_refreshed();
                    touched = true;
                }
                Err(e) => failures.push(format!("popup: {}", e)),
            }
        }

        if !failures.is_empty() {
            return Err(MapSyncError::MarkerUpdate {
                unit_id: unit.id.clone(),
                reason: failures.join("; "),
            });
        }
        if !touched {
            report.unchanged += 1;
        }
        Ok(())
    }

    /// Remove every live marker. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.markers.len();
        for (_, mut marker) in self.markers.drain() {
            marker.handle.remove();
        }
        count
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn contains(&self, unit_id: &UnitId) -> bool {
        self.markers.contains_key(unit_id)
    }

    /// Live ids, sorted.
    pub fn ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self.markers.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn marker(&self, unit_id: &UnitId) -> Option<&LiveMarker<M>> {
        self.markers.get(unit_id)
    }

    pub fn position(&self, unit_id: &UnitId) -> Option<Coordinates> {
        self.markers.get(unit_id).map(|m| m.coordinates)
    }
}

impl<M: MarkerHandle> Drop for MarkerReconciler<M> {
    fn drop(&mut self) {
        self.clear();
    }
}

fn skip(
    report: &mut ReconcileReport,
    metrics: &dyn MetricsRecorder,
    unit_id: &UnitId,
    reason: MapSyncError,
) {
    warn!(unit_id = %unit_id, error = %reason, "[MarkerReconciler] Unit skipped");
    metrics.record_unit_skipped();
    report.skipped.push(SkippedUnit {
        unit_id: unit_id.clone(),
        reason,
    });
}
