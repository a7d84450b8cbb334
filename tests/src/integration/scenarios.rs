//! # Roster Scenarios
//!
//! Marker lifecycle across consecutive roster snapshots:
//!
//! 1. First sighting creates a marker at the unit position
//! 2. A later sighting moves the same marker in place
//! 3. A unit leaving the roster loses its marker in the same pass
//! 4. A surface without a credential never shows a marker
//! 5. Dispose leaves nothing behind, and later passes are ignored

#[cfg(test)]
mod tests {
    use fleet_types::{Coordinates, UnitId};
    use fm_map_sync::{
        DegradedReason, HeadlessSurfaceFactory, MapSyncApi, MapSyncError, MapSyncService,
        SurfaceState,
    };

    use crate::fixtures::{fleet, map_config, ready_service, unit, unit_without_fix};

    // =============================================================================
    // SCENARIOS 1-3: CREATE, MOVE, REMOVE
    // =============================================================================

    #[test]
    fn test_first_sighting_creates_marker() {
        let (mut service, scene) = ready_service();

        let report = service.reconcile(&[unit("A", 10.0, 10.0)]);

        assert_eq!(report.created, 1);
        assert_eq!(scene.live_marker_count(), 1);
        assert_eq!(scene.marker_position("A"), Some(Coordinates::new(10.0, 10.0)));
    }

    #[test]
    fn test_move_keeps_marker_instance() {
        let (mut service, scene) = ready_service();
        service.reconcile(&[unit("A", 10.0, 10.0)]);

        let report = service.reconcile(&[unit("A", 12.0, 10.0)]);

        assert_eq!(report.moved, 1);
        assert_eq!(report.created, 0);
        assert_eq!(scene.live_marker_count(), 1);
        assert_eq!(scene.total_created(), 1);
        assert_eq!(scene.total_removed(), 0);
        assert_eq!(scene.marker_position("A"), Some(Coordinates::new(12.0, 10.0)));
    }

    #[test]
    fn test_departed_unit_removed_others_untouched() {
        let (mut service, scene) = ready_service();
        service.reconcile(&[unit("A", 12.0, 10.0), unit("B", 0.0, 0.0)]);
        assert_eq!(scene.live_marker_count(), 2);
        let b_before = scene.marker("B").unwrap();

        let report = service.reconcile(&[unit("B", 0.0, 0.0)]);

        assert_eq!(report.removed, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(scene.marker_ids(), vec![UnitId::from("B")]);
        assert_eq!(scene.marker("B").unwrap(), b_before);
    }

    #[test]
    fn test_empty_roster_clears_markers() {
        let (mut service, scene) = ready_service();
        service.reconcile(&fleet(25));
        assert_eq!(scene.live_marker_count(), 25);

        let report = service.reconcile(&[]);

        assert_eq!(report.removed, 25);
        assert_eq!(scene.live_marker_count(), 0);
        assert!(service.live_marker_ids().is_empty());
    }

    // =============================================================================
    // SCENARIO 4: DEGRADED SURFACE
    // =============================================================================

    #[test]
    fn test_missing_credential_never_draws() {
        let factory = HeadlessSurfaceFactory::new();
        let scene = factory.scene();
        let mut service = MapSyncService::new(factory);
        let mut config = map_config();
        config.credential = None;

        let state = service.initialize(config);
        service.surface_ready();
        for _ in 0..3 {
            let report = service.reconcile(&fleet(5));
            assert!(!report.applied);
        }

        assert_eq!(
            state,
            SurfaceState::Degraded(DegradedReason::MissingCredential)
        );
        assert_eq!(state.to_string(), "degraded(missing-credential)");
        assert_eq!(scene.surfaces_created(), 0);
        assert_eq!(scene.total_created(), 0);
        assert_eq!(service.metrics().passes, 0);
    }

    // =============================================================================
    // SCENARIO 5: DISPOSE
    // =============================================================================

    #[test]
    fn test_dispose_with_live_markers() {
        let (mut service, scene) = ready_service();
        service.reconcile(&[
            unit("A", 1.0, 1.0),
            unit("B", 2.0, 2.0),
            unit("C", 3.0, 3.0),
        ]);
        assert_eq!(service.overlay_count(), 1);

        service.dispose();

        assert_eq!(service.state(), SurfaceState::Disposed);
        assert_eq!(scene.live_marker_count(), 0);
        assert_eq!(scene.layer_count(), 0);
        assert_eq!(scene.source_count(), 0);
        assert_eq!(service.overlay_count(), 0);

        let report = service.reconcile(&[unit("D", 4.0, 4.0)]);
        assert!(!report.applied);
        assert_eq!(scene.live_marker_count(), 0);
        assert_eq!(scene.total_created(), 3);
    }

    #[test]
    fn test_dispose_is_idempotent_from_every_state() {
        let mut fresh = MapSyncService::new(HeadlessSurfaceFactory::new());
        fresh.dispose();
        fresh.dispose();
        assert_eq!(fresh.state(), SurfaceState::Disposed);

        let mut degraded = MapSyncService::new(HeadlessSurfaceFactory::failing("no gpu"));
        degraded.initialize(map_config());
        assert!(degraded.state().is_degraded());
        degraded.dispose();
        assert_eq!(degraded.state(), SurfaceState::Disposed);

        let (mut ready, _) = ready_service();
        ready.dispose();
        ready.dispose();
        assert_eq!(ready.state(), SurfaceState::Disposed);
    }

    #[test]
    fn test_pending_roster_never_reaches_disposed_surface() {
        let (mut service, scene) = ready_service();
        service.reconcile(&[unit("A", 1.0, 1.0)]);
        service.submit_roster(fleet(10));

        service.dispose();
        assert!(service.flush().is_none());
        service.submit_roster(fleet(10));
        assert!(service.flush().is_none());

        assert_eq!(scene.total_created(), 1);
        assert_eq!(scene.live_marker_count(), 0);
    }

    // =============================================================================
    // PARTIAL FAILURE ISOLATION
    // =============================================================================

    #[test]
    fn test_one_invalid_unit_out_of_ten() {
        let (mut service, scene) = ready_service();
        let mut roster = fleet(10);
        roster[4] = unit_without_fix("UNIT-0004");

        let report = service.reconcile(&roster);

        assert!(report.applied);
        assert_eq!(report.created, 9);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].unit_id, UnitId::from("UNIT-0004"));
        assert!(matches!(
            report.skipped[0].reason,
            MapSyncError::MarkerCreation { .. }
        ));
        assert_eq!(scene.live_marker_count(), 9);
        assert_eq!(service.metrics().units_skipped, 1);
    }

    #[test]
    fn test_skipped_unit_retried_on_next_roster() {
        let (mut service, scene) = ready_service();
        service.reconcile(&[unit("A", 1.0, 1.0), unit_without_fix("B")]);
        assert_eq!(scene.live_marker_count(), 1);

        let report = service.reconcile(&[unit("A", 1.0, 1.0), unit("B", 2.0, 2.0)]);

        assert_eq!(report.created, 1);
        assert_eq!(scene.live_marker_count(), 2);
    }

    #[test]
    fn test_backend_rejection_is_isolated() {
        let factory = HeadlessSurfaceFactory::new().rejecting("UNIT-0002");
        let scene = factory.scene();
        let mut service = MapSyncService::new(factory);
        service.initialize(map_config());

        let report = service.reconcile(&fleet(5));

        assert_eq!(report.created, 4);
        assert_eq!(report.skipped_ids(), vec![UnitId::from("UNIT-0002")]);
        assert_eq!(scene.markers_for("UNIT-0002"), 0);
    }
}
