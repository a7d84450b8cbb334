//! Keyed roster diff
//!
//! Splits an incoming roster against the ids currently on the surface into
//! the three reconciliation sets. Hash based and order independent; runs in
//! O(|existing| + |incoming|).

use std::collections::{HashMap, HashSet};

use fleet_types::{Unit, UnitId};

/// Result of diffing a roster against the live marker registry.
#[derive(Debug, Default)]
pub struct RosterDiff<'a> {
    /// Ids seen for the first time
    pub to_create: Vec<&'a Unit>,
    /// Ids already on the surface
    pub to_update: Vec<&'a Unit>,
    /// Ids on the surface but absent from the roster
    pub to_remove: Vec<UnitId>,
    /// Repeated ids after their first occurrence in the roster
    pub duplicates: Vec<&'a Unit>,
}

impl<'a> RosterDiff<'a> {
    /// Compute the diff. The first occurrence of an id wins.
    pub fn compute<V>(existing: &HashMap<UnitId, V>, roster: &'a [Unit]) -> Self {
        let mut diff = RosterDiff::default();
        let mut incoming: HashSet<&UnitId> = HashSet::with_capacity(roster.len());

        for unit in roster {
            if !incoming.insert(&unit.id) {
                diff.duplicates.push(unit);
                continue;
            }
            if existing.contains_key(&unit.id) {
                diff.to_update.push(unit);
            } else {
                diff.to_create.push(unit);
            }
        }

        diff.to_remove = existing
            .keys()
            .filter(|id| !incoming.contains(id))
            .cloned()
            .collect();

        diff
    }
}
