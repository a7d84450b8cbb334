//! # Property Tests: Reconciliation invariants
//!
//! Random roster sequences with repeated ids, lost position fixes and
//! out-of-range coordinates. After every pass:
//!
//! 1. Reconciling the same roster twice changes nothing the second time
//! 2. Live markers are a subset of the roster ids, and every id whose first
//!    entry has a valid position is live
//! 3. No id ever has more than one marker on the surface
//! 4. Dispose removes everything that was ever created

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use fleet_types::{Unit, UnitId, UnitStatus};
    use fm_map_sync::MapSyncApi;
    use proptest::prelude::*;

    use crate::fixtures::ready_service;

    // Small id space so duplicates and re-sightings are common
    fn unit_id_strategy() -> impl Strategy<Value = String> {
        (0u8..12).prop_map(|n| format!("U{:02}", n))
    }

    fn status_strategy() -> impl Strategy<Value = UnitStatus> {
        prop_oneof![
            Just(UnitStatus::Available),
            Just(UnitStatus::EnRoute),
            Just(UnitStatus::OnScene),
            Just(UnitStatus::Unavailable),
        ]
    }

    // Mostly valid fixes, with lost and out-of-range ones mixed in
    fn position_strategy() -> impl Strategy<Value = Option<(f64, f64)>> {
        prop_oneof![
            6 => (-180.0f64..=180.0, -90.0f64..=90.0).prop_map(Some),
            1 => Just(None),
            1 => (180.5f64..400.0, -90.0f64..=90.0).prop_map(Some),
            1 => (-180.0f64..=180.0, 90.5f64..200.0).prop_map(Some),
        ]
    }

    fn unit_strategy() -> impl Strategy<Value = Unit> {
        (
            unit_id_strategy(),
            status_strategy(),
            position_strategy(),
            0u8..60,
        )
            .prop_map(|(id, status, position, age)| {
                let unit = Unit::new(id.clone(), format!("Unit {}", id), status)
                    .updated(format!("{}s ago", age));
                match position {
                    Some((lon, lat)) => unit.at(lon, lat),
                    None => unit,
                }
            })
    }

    fn roster_strategy() -> impl Strategy<Value = Vec<Unit>> {
        prop::collection::vec(unit_strategy(), 0..20)
    }

    /// Ids whose first roster entry carries a valid position.
    fn drawable_ids(roster: &[Unit]) -> HashSet<UnitId> {
        let mut seen = HashSet::new();
        let mut drawable = HashSet::new();
        for unit in roster {
            if seen.insert(unit.id.clone()) && unit.position().is_ok() {
                drawable.insert(unit.id.clone());
            }
        }
        drawable
    }

    proptest! {
        /// A second pass over an unchanged roster touches nothing
        #[test]
        fn prop_reconcile_is_idempotent(roster in roster_strategy()) {
            let (mut service, scene) = ready_service();
            service.reconcile(&roster);
            let created = scene.total_created();
            let before: Vec<_> = service
                .live_marker_ids()
                .iter()
                .map(|id| scene.marker(id.as_str()))
                .collect();

            let report = service.reconcile(&roster);

            prop_assert!(report.is_noop(), "second pass changed the surface: {:?}", report);
            prop_assert_eq!(scene.total_created(), created);
            let after: Vec<_> = service
                .live_marker_ids()
                .iter()
                .map(|id| scene.marker(id.as_str()))
                .collect();
            prop_assert_eq!(before, after);
        }

        /// Markers converge to the latest roster whatever came before
        #[test]
        fn prop_markers_converge_to_latest_roster(
            first in roster_strategy(),
            second in roster_strategy(),
        ) {
            let (mut service, _scene) = ready_service();
            service.reconcile(&first);
            service.reconcile(&second);

            let live: HashSet<UnitId> = service.live_marker_ids().into_iter().collect();
            let roster_ids: HashSet<UnitId> = second.iter().map(|u| u.id.clone()).collect();

            prop_assert!(live.is_subset(&roster_ids), "stale marker left: {:?}", live.difference(&roster_ids).collect::<Vec<_>>());
            prop_assert!(drawable_ids(&second).is_subset(&live));
        }

        /// One marker per id on the surface, matching the registry
        #[test]
        fn prop_one_marker_per_unit(
            rosters in prop::collection::vec(roster_strategy(), 1..6),
        ) {
            let (mut service, scene) = ready_service();
            for roster in &rosters {
                service.reconcile(roster);

                prop_assert_eq!(scene.live_marker_count(), service.marker_count());
                for id in scene.marker_ids() {
                    prop_assert!(scene.markers_for(id.as_str()) <= 1, "{} drawn twice", id);
                }
            }
        }

        /// Dispose leaves no marker, source or layer behind
        #[test]
        fn prop_dispose_leaves_nothing(
            rosters in prop::collection::vec(roster_strategy(), 0..6),
        ) {
            let (mut service, scene) = ready_service();
            for roster in &rosters {
                service.reconcile(roster);
            }

            service.dispose();

            prop_assert_eq!(scene.live_marker_count(), 0);
            prop_assert_eq!(scene.total_created(), scene.total_removed());
            prop_assert_eq!(scene.source_count(), 0);
            prop_assert_eq!(scene.layer_count(), 0);
            prop_assert!(scene.is_destroyed());
        }
    }
}
