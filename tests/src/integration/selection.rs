//! # Selection Integration
//!
//! Marker clicks reach the host's `on_select` callback with the latest unit
//! record, and stop reaching it once the map is disposed.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fleet_types::{Unit, UnitId, UnitStatus};
    use fm_map_sync::MapSyncApi;
    use parking_lot::Mutex;

    use crate::fixtures::{ready_service, unit, HeadlessService};

    type Selections = Arc<Mutex<Vec<Option<Unit>>>>;

    fn capture(service: &HeadlessService) -> Selections {
        let selections: Selections = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&selections);
        service.set_on_select(move |unit| sink.lock().push(unit));
        selections
    }

    #[test]
    fn test_click_delivers_full_record() {
        let (mut service, scene) = ready_service();
        let selections = capture(&service);
        let alfa = Unit::new("ALFA-01", "ICU Alfa 01", UnitStatus::OnScene)
            .at(-48.55, -27.6)
            .with_destination("Hospital Celso Ramos")
            .updated("18s ago");
        service.reconcile(&[alfa.clone(), unit("BRAVO-02", 0.0, 0.0)]);

        assert!(scene.click("ALFA-01"));

        assert_eq!(*selections.lock(), vec![Some(alfa)]);
    }

    #[test]
    fn test_popups_stay_independent() {
        let (mut service, scene) = ready_service();
        let selections = capture(&service);
        service.reconcile(&[unit("A", 1.0, 1.0), unit("B", 2.0, 2.0)]);

        scene.click("A");
        scene.click("B");
        scene.click("A");

        let ids: Vec<_> = selections
            .lock()
            .iter()
            .map(|u| u.as_ref().map(|u| u.id.clone()))
            .collect();
        assert_eq!(
            ids,
            vec![
                Some(UnitId::from("A")),
                Some(UnitId::from("B")),
                Some(UnitId::from("A"))
            ]
        );
    }

    #[test]
    fn test_clear_and_unknown_deliver_none() {
        let (mut service, _) = ready_service();
        let selections = capture(&service);
        service.reconcile(&[unit("A", 1.0, 1.0)]);

        assert!(service.clear_selection());
        assert!(service.on_unit_clicked(&UnitId::from("GONE-1")));

        assert_eq!(*selections.lock(), vec![None, None]);
    }

    #[test]
    fn test_removed_marker_no_longer_clickable() {
        let (mut service, scene) = ready_service();
        let selections = capture(&service);
        service.reconcile(&[unit("A", 1.0, 1.0)]);
        service.reconcile(&[]);

        assert!(!scene.click("A"));
        assert!(selections.lock().is_empty());
    }

    #[test]
    fn test_clicks_after_dispose_ignored() {
        let (mut service, scene) = ready_service();
        let selections = capture(&service);
        service.reconcile(&[unit("A", 1.0, 1.0)]);

        service.dispose();

        assert!(!scene.click("A"));
        assert!(!service.on_unit_clicked(&UnitId::from("A")));
        assert!(selections.lock().is_empty());
        assert_eq!(service.metrics().selections_delivered, 0);
    }
}
