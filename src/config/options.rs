//! Per-call options, generalized from the teacher's `CallOptions`: the only
//! thing a caller can override on an individual RPC is its deadline (spec
//! §4.6 — "if the caller's context has no deadline, attach the per-RPC
//! default"). Everything else (retry policy, TLS, credentials) lives on
//! `ClientBuilder` because it applies to the whole client, not one call.

use std::time::Duration;

/// A caller-supplied deadline never gets shortened by a wrapper-attached
/// default (spec §3 invariant) — `CallOptions::default()` carries no
/// timeout at all, letting each typed wrapper decide its own default only
/// when this is empty.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolves the effective deadline: the caller's own timeout if given,
    /// otherwise the wrapper's per-RPC default.
    pub fn resolve_timeout(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }
}
