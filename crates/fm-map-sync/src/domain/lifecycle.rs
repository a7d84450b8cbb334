//! Surface lifecycle state machine
//!
//! The lifecycle controller owns the one-way progression of a map surface.
//! A surface either comes up `Ready`, or falls back to `Degraded` when the
//! host cannot provide a usable credential or backend. Both end in `Disposed`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a surface came up degraded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegradedReason {
    /// No credential configured, or a blank one
    MissingCredential,
    /// Credential present but malformed
    InvalidCredential,
    /// Center or zoom outside the engine's accepted range
    InvalidConfig,
    /// Backend refused to create the surface
    SurfaceUnavailable,
}

impl DegradedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegradedReason::MissingCredential => "missing-credential",
            DegradedReason::InvalidCredential => "invalid-credential",
            DegradedReason::InvalidConfig => "invalid-config",
            DegradedReason::SurfaceUnavailable => "surface-unavailable",
        }
    }
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of the rendering surface
///
/// State Machine:
/// ```text
/// [UNINITIALIZED] ──init ok──────→ [READY] ─────dispose──→ [DISPOSED]
///        │                                                     ↑
///        └────────init failure──→ [DEGRADED] ──dispose─────────┘
/// ```
///
/// `Disposed` is terminal and `Degraded` never returns to `Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SurfaceState {
    #[default]
    Uninitialized,
    Ready,
    Degraded(DegradedReason),
    Disposed,
}

impl SurfaceState {
    pub fn is_ready(&self) -> bool {
        matches!(self, SurfaceState::Ready)
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self, SurfaceState::Disposed)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SurfaceState::Degraded(_))
    }
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceState::Uninitialized => f.write_str("uninitialized"),
            SurfaceState::Ready => f.write_str("ready"),
            SurfaceState::Degraded(reason) => write!(f, "degraded({})", reason),
            SurfaceState::Disposed => f.write_str("disposed"),
        }
    }
}

/// Events that drive lifecycle transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Backend surface was created
    SurfaceCreated,
    /// Initialization failed for the given reason
    InitFailed(DegradedReason),
    /// Host requested teardown
    DisposeRequested,
}

/// Lifecycle controller for one surface instance
#[derive(Debug, Default)]
pub struct LifecycleController {
    state: SurfaceState,
    /// Initialization attempts ignored because the surface already exists
    redundant_inits: u64,
    /// Dispose requests received, including repeats
    dispose_requests: u64,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Whether `initialize` may still create a surface.
    pub fn accepts_init(&self) -> bool {
        matches!(self.state, SurfaceState::Uninitialized)
    }

    /// Note an `initialize` call that was ignored.
    pub fn note_redundant_init(&mut self) {
        self.redundant_inits += 1;
    }

    pub fn redundant_inits(&self) -> u64 {
        self.redundant_inits
    }

    pub fn dispose_requests(&self) -> u64 {
        self.dispose_requests
    }

    /// Process an event and transition state
    pub fn process_event(&mut self, event: LifecycleEvent) -> SurfaceState {
        if event == LifecycleEvent::DisposeRequested {
            self.dispose_requests += 1;
        }
        self.state = self.next_state(event);
        self.state
    }

    /// Pure transition function; monotonic by construction.
    fn next_state(&self, event: LifecycleEvent) -> SurfaceState {
        match (self.state, event) {
            (SurfaceState::Disposed, _) => SurfaceState::Disposed,
            (_, LifecycleEvent::DisposeRequested) => SurfaceState::Disposed,

            (SurfaceState::Uninitialized, LifecycleEvent::SurfaceCreated) => SurfaceState::Ready,
            (SurfaceState::Uninitialized, LifecycleEvent::InitFailed(reason)) => {
                SurfaceState::Degraded(reason)
            }

            // Ready and Degraded ignore further init outcomes
            (state, _) => state,
        }
    }
}

/// Check the engine credential.
///
/// Absent or blank is `MissingCredential`; a token carrying whitespace or
/// control characters is `InvalidCredential`.
pub fn check_credential(credential: Option<&str>) -> Result<&str, DegradedReason> {
    let credential = match credential {
        Some(c) if !c.trim().is_empty() => c,
        _ => return Err(DegradedReason::MissingCredential),
    };

    if credential
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(DegradedReason::InvalidCredential);
    }

    Ok(credential)
}
