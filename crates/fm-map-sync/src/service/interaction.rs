//! Interaction Bridge
//!
//! Routes marker clicks to the single selection callback supplied by the
//! host. Marker handlers hold only a weak reference to the bridge state, so a
//! handler that outlives the service becomes inert instead of keeping the
//! roster alive.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use fleet_types::{Unit, UnitId};
use parking_lot::Mutex;
use tracing::debug;

use crate::metrics::MetricsRecorder;
use crate::ports::ClickHandler;

/// Selection callback: the full unit record, or `None` to clear selection.
pub type SelectCallback = Arc<dyn Fn(Option<Unit>) + Send + Sync>;

struct BridgeState {
    on_select: Option<SelectCallback>,
    /// Latest record per id, used to resolve clicks
    roster: HashMap<UnitId, Unit>,
    attached: bool,
}

/// Click-to-select bridge shared between the service and marker handlers.
#[derive(Clone)]
pub struct InteractionBridge {
    state: Arc<Mutex<BridgeState>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl InteractionBridge {
    pub fn new(metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self {
            state: Arc::new(Mutex::new(BridgeState {
                on_select: None,
                roster: HashMap::new(),
                attached: true,
            })),
            metrics,
        }
    }

    /// Install or replace the selection callback.
    pub fn set_on_select(&self, callback: SelectCallback) {
        self.state.lock().on_select = Some(callback);
    }

    /// Handler registered on the marker for `unit_id`.
    pub fn click_handler(&self, unit_id: UnitId) -> ClickHandler {
        let state: Weak<Mutex<BridgeState>> = Arc::downgrade(&self.state);
        let metrics = Arc::clone(&self.metrics);
        Box::new(move || {
            if let Some(state) = state.upgrade() {
                deliver(&state, &*metrics, Some(&unit_id));
            }
        })
    }

    /// Deliver the record for `unit_id`, or `None` if the id is unknown.
    ///
    /// Returns whether the callback was invoked.
    pub fn on_unit_clicked(&self, unit_id: &UnitId) -> bool {
        deliver(&self.state, &*self.metrics, Some(unit_id))
    }

    /// Deliver `None` to the callback.
    pub fn clear_selection(&self) -> bool {
        deliver(&self.state, &*self.metrics, None)
    }

    /// Replace the records clicks resolve against. First occurrence wins.
    pub fn sync_roster(&self, roster: &[Unit]) {
        let mut state = self.state.lock();
        if !state.attached {
            return;
        }
        state.roster.clear();
        for unit in roster {
            state
                .roster
                .entry(unit.id.clone())
                .or_insert_with(|| unit.clone());
        }
    }

    /// Stop delivering selections. Permanent.
    pub fn detach(&self) {
        let mut state = self.state.lock();
        state.attached = false;
        state.on_select = None;
        state.roster.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.state.lock().attached
    }
}

/// Resolve and deliver one selection. The callback runs outside the lock so
/// it may call back into the bridge.
fn deliver(
    state: &Mutex<BridgeState>,
    metrics: &dyn MetricsRecorder,
    unit_id: Option<&UnitId>,
) -> bool {
    let (callback, selection) = {
        let state = state.lock();
        if !state.attached {
            debug!(unit_id = ?unit_id, "[InteractionBridge] Click after detach ignored");
            return false;
        }
        let Some(callback) = state.on_select.clone() else {
            return false;
        };
        let selection = unit_id.and_then(|id| state.roster.get(id).cloned());
        (callback, selection)
    };

    debug!(
        unit_id = ?unit_id,
        resolved = selection.is_some(),
        "[InteractionBridge] Delivering selection"
    );
    callback(selection);
    metrics.record_selection();
    true
}
