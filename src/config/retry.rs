//! Jittered exponential backoff, generalized from the teacher's
//! `config::retry` module to this crate's two descriptors (spec §3): the
//! unary/stream retry policy and the separate, tighter dial backoff policy.

use std::time::Duration;

/// Defaults from spec §3. Two call sites use two different constant sets —
/// `RetryPolicy::default()` for RPC retries, `RetryPolicy::dial_default()`
/// for the Channel Owner's reconnect backoff.
pub mod defaults {
    use std::time::Duration;

    pub const INITIAL_DELAY: Duration = Duration::from_millis(500);
    pub const MAX_DELAY: Duration = Duration::from_secs(5);
    pub const MULTIPLIER: f64 = 2.0;
    pub const JITTER: f64 = 0.25;

    pub const DIAL_BASE_DELAY: Duration = Duration::from_millis(200);
    pub const DIAL_MAX_DELAY: Duration = Duration::from_secs(3);
    pub const DIAL_MULTIPLIER: f64 = 1.6;
    pub const DIAL_JITTER: f64 = 0.20;
}

/// Describes a backoff curve. Retries driven by this policy are unbounded
/// in count (spec §4.3) — only the caller's own deadline or cancellation
/// ends a retry loop, so there is deliberately no `max_retries` field here
/// (unlike the teacher's `RetryPolicy`, which bounds attempts).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: defaults::INITIAL_DELAY,
            max_delay: defaults::MAX_DELAY,
            multiplier: defaults::MULTIPLIER,
            jitter: defaults::JITTER,
        }
    }
}

impl RetryPolicy {
    /// The separate, tighter descriptor used only for dial/reconnect
    /// backoff on the transport itself (spec §3, §4.1).
    pub fn dial_default() -> Self {
        Self {
            initial_delay: defaults::DIAL_BASE_DELAY,
            max_delay: defaults::DIAL_MAX_DELAY,
            multiplier: defaults::DIAL_MULTIPLIER,
            jitter: defaults::DIAL_JITTER,
        }
    }

    /// The stream pump's own fixed `500ms ± 250ms` reconnect/backoff
    /// interval (spec §4.4). Not exponential — every iteration waits the
    /// same jittered interval.
    pub fn stream_pump() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(500),
            multiplier: 1.0,
            jitter: 0.5,
        }
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn backoff(self) -> ExponentialBackoff {
        ExponentialBackoff::new(self)
    }
}

/// Stateful cursor over a `RetryPolicy`'s curve. One instance per retry
/// loop; `next_delay` both returns the delay to sleep and advances the
/// cursor, mirroring the teacher's `ExponentialBackoff`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    policy: RetryPolicy,
    current_delay: Duration,
    attempts: u32,
}

impl ExponentialBackoff {
    pub fn new(policy: RetryPolicy) -> Self {
        let current_delay = policy.initial_delay;
        Self { policy, current_delay, attempts: 0 }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The delay the *next* call to `next_delay` would sleep, without
    /// advancing the cursor. Useful for logging ("retrying in %s") before
    /// the sleep actually starts.
    pub fn peek_delay(&self) -> Duration {
        self.current_delay
    }

    /// Returns the jittered delay for this attempt and advances the
    /// cursor's base delay toward `max_delay`.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.current_delay.as_secs_f64();
        let jitter_range = self.policy.jitter * 2.0;
        let random_factor = rand::random::<f64>() * jitter_range - self.policy.jitter;
        let jittered = (base * (1.0 + random_factor)).max(0.0);

        self.attempts += 1;
        let advanced = base * self.policy.multiplier;
        self.current_delay =
            Duration::from_secs_f64(advanced.min(self.policy.max_delay.as_secs_f64()));

        Duration::from_secs_f64(jittered)
    }

    pub fn reset(&mut self) {
        self.current_delay = self.policy.initial_delay;
        self.attempts = 0;
    }
}
