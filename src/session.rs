//! Session Identity (spec §4.2): the opaque session identifier a connected
//! client carries on every call, plus the client-visible lifecycle state
//! (spec §4.7).

use arc_swap::ArcSwapOption;
use uuid::Uuid;

/// States of `spec.md` §4.7's state machine that the client itself tracks.
/// The `session_live ⇄ session_lost` edge is driven by the executors and
/// never observed directly by callers — it only ever shows up as a brief
/// window where `SessionIdentity::current()` returns the stale id while a
/// reconnect is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Fresh,
    ConnectedTransport,
    SessionLive,
    SessionClosed,
}

/// Holds the current session identifier. Read-mostly: every outgoing call
/// reads it once (`current`), writes only happen on connect/reconnect/close.
///
/// Backed by `ArcSwapOption` rather than `Mutex`/`RwLock` — ids are cheap
/// `Copy` values so there is no reason to pay for exclusive access on the
/// read path (see DESIGN.md for the alternative considered).
pub struct SessionIdentity {
    id: ArcSwapOption<Uuid>,
}

impl SessionIdentity {
    pub fn new(initial: Option<Uuid>) -> Self {
        Self { id: ArcSwapOption::new(initial.map(std::sync::Arc::new)) }
    }

    /// The identifier attached to the next outgoing call, if the client is
    /// connected. `None` means "not connected" and callers must refuse to
    /// dispatch (spec §3 invariant).
    pub fn current(&self) -> Option<Uuid> {
        self.id.load_full().map(|arc| *arc)
    }

    pub fn is_connected(&self) -> bool {
        self.id.load().is_some()
    }

    /// Installs a freshly-minted or gateway-returned identifier, replacing
    /// whatever was there. Called after a successful connect/reconnect.
    pub fn set(&self, id: Uuid) {
        self.id.store(Some(std::sync::Arc::new(id)));
    }

    /// Clears the identifier. Called on disconnect/close.
    pub fn clear(&self) {
        self.id.store(None);
    }
}
