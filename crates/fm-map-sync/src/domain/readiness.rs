//! Readiness gate for the asynchronous "surface loaded" signal.
//!
//! The map engine finishes loading its style some time after the surface
//! object exists. Sources and layers can only be added after that point, so
//! overlay setup consults this gate instead of relying on callback ordering.

/// Gate position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    NotReady,
    Ready,
}

/// Two-state readiness gate. Opens once and stays open.
#[derive(Debug, Default)]
pub struct ReadinessGate {
    state: GateState,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::Ready
    }

    /// Open the gate. Returns `true` only on the first call.
    pub fn open(&mut self) -> bool {
        let was_closed = self.state == GateState::NotReady;
        self.state = GateState::Ready;
        was_closed
    }
}
