//! Message Gate Module
//!
//! Admission gate for a per-user message flow. Wraps the sliding window
//! limiter with the check-then-record protocol and surfaces a retry delay
//! to denied callers.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::limiter::{RateLimitPolicy, SlidingWindowLimiter};

// == Gate Decision ==
/// Outcome of an admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The message was admitted and its timestamp recorded.
    Admitted,
    /// The message was denied; the sender may retry after `retry_after`.
    Denied { retry_after: Duration },
}

// == Gate Stats ==
/// Tracks admission outcomes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GateStats {
    /// Number of admitted messages
    pub admitted: u64,
    /// Number of denied messages
    pub denied: u64,
}

impl GateStats {
    /// Calculates the fraction of attempts that were denied.
    ///
    /// Returns denied / (admitted + denied), or 0.0 before any attempt.
    pub fn denial_rate(&self) -> f64 {
        let total = self.admitted + self.denied;
        if total == 0 {
            0.0
        } else {
            self.denied as f64 / total as f64
        }
    }
}

// == Message Gate ==
/// Admits or denies messages per user under a sliding-window policy.
///
/// Each decision reads the clock once: the admission check and the recording
/// of an admitted message both see the same instant, so a message is never
/// recorded under a different window than the one it was checked against.
pub struct MessageGate {
    limiter: SlidingWindowLimiter<String>,
    stats: GateStats,
}

impl MessageGate {
    // == Constructor ==
    /// Creates a gate enforcing the given (already validated) policy.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            limiter: SlidingWindowLimiter::new(policy),
            stats: GateStats::default(),
        }
    }

    // == Try Send ==
    /// Attempts to admit a message from `user`.
    ///
    /// On admission the message timestamp is recorded. On denial nothing is
    /// recorded and the returned delay says when the oldest message ages out
    /// of the window.
    pub fn try_send(&mut self, user: &str) -> GateDecision {
        self.try_send_at(user, Instant::now())
    }

    /// [`try_send`](Self::try_send) with an explicit "now".
    pub fn try_send_at(&mut self, user: &str, now: Instant) -> GateDecision {
        let user = user.to_owned();
        if self.limiter.can_proceed_at(&user, now) {
            // Already checked against this same instant
            self.limiter.record_unchecked_at(&user, now);
            self.stats.admitted += 1;
            GateDecision::Admitted
        } else {
            let retry_after = self.limiter.time_until_next_allowed_at(&user, now);
            self.stats.denied += 1;
            debug!(user = %user, ?retry_after, "message denied by rate limit");
            GateDecision::Denied { retry_after }
        }
    }

    // == Messages In Window ==
    /// Returns how many of `user`'s messages are in the current window.
    pub fn messages_in_window(&mut self, user: &str) -> usize {
        self.messages_in_window_at(user, Instant::now())
    }

    /// [`messages_in_window`](Self::messages_in_window) with an explicit
    /// "now".
    pub fn messages_in_window_at(&mut self, user: &str, now: Instant) -> usize {
        self.limiter.count_at(&user.to_owned(), now)
    }

    // == Stats ==
    /// Returns a snapshot of admission statistics.
    pub fn stats(&self) -> GateStats {
        self.stats.clone()
    }

    /// Returns the enforced policy.
    pub fn policy(&self) -> &RateLimitPolicy {
        self.limiter.policy()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> MessageGate {
        let policy = RateLimitPolicy::new(Duration::from_secs(10), 1).unwrap();
        MessageGate::new(policy)
    }

    #[test]
    fn test_first_message_admitted() {
        let mut gate = gate();
        let now = Instant::now();

        assert_eq!(gate.try_send_at("user_1", now), GateDecision::Admitted);
        assert_eq!(gate.messages_in_window_at("user_1", now), 1);
    }

    #[test]
    fn test_second_message_denied_with_retry_delay() {
        let mut gate = gate();
        let t0 = Instant::now();

        gate.try_send_at("user_1", t0);

        let decision = gate.try_send_at("user_1", t0 + Duration::from_secs(3));
        assert_eq!(
            decision,
            GateDecision::Denied {
                retry_after: Duration::from_secs(7)
            }
        );

        // Denied attempts record nothing
        assert_eq!(
            gate.messages_in_window_at("user_1", t0 + Duration::from_secs(3)),
            1
        );
    }

    #[test]
    fn test_admitted_again_after_window() {
        let mut gate = gate();
        let t0 = Instant::now();

        gate.try_send_at("user_1", t0);

        let later = t0 + Duration::from_millis(10_001);
        assert_eq!(gate.try_send_at("user_1", later), GateDecision::Admitted);
    }

    #[test]
    fn test_users_are_isolated() {
        let mut gate = gate();
        let now = Instant::now();

        assert_eq!(gate.try_send_at("user_1", now), GateDecision::Admitted);
        assert_eq!(gate.try_send_at("user_2", now), GateDecision::Admitted);

        assert!(matches!(
            gate.try_send_at("user_1", now),
            GateDecision::Denied { .. }
        ));
        assert_eq!(gate.messages_in_window_at("user_2", now), 1);
    }

    #[test]
    fn test_gate_stats() {
        let mut gate = gate();
        let now = Instant::now();

        gate.try_send_at("user_1", now);
        gate.try_send_at("user_1", now);
        gate.try_send_at("user_1", now);

        let stats = gate.stats();
        assert_eq!(stats.admitted, 1);
        assert_eq!(stats.denied, 2);
        assert!((stats.denial_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_denial_rate_no_attempts() {
        let gate = gate();
        assert_eq!(gate.stats().denial_rate(), 0.0);
    }
}
