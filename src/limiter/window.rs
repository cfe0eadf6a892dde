//! Sliding Window Limiter Module
//!
//! Per-subject event logs evaluated against a (window, max events) policy.
//! True sliding-window accounting: raw timestamps are retained and the
//! window boundary is re-evaluated against "now" on every access, so there
//! is no fixed-bucket boundary burst where two windows' worth of events
//! land back to back.
//!
//! Timestamps are pruned lazily, on the next access for that subject.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Error, Result};

// == Rate Limit Policy ==
/// Window length and per-window event budget, shared across all subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    window: Duration,
    max_events: usize,
}

impl RateLimitPolicy {
    /// Creates a validated policy.
    ///
    /// # Errors
    /// Returns [`Error::InvalidWindow`] for a zero window and
    /// [`Error::InvalidLimit`] for a zero event budget.
    pub fn new(window: Duration, max_events: usize) -> Result<Self> {
        if window.is_zero() {
            return Err(Error::InvalidWindow);
        }
        if max_events == 0 {
            return Err(Error::InvalidLimit);
        }
        Ok(Self { window, max_events })
    }

    /// Returns the window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns the maximum events allowed per window.
    pub fn max_events(&self) -> usize {
        self.max_events
    }
}

// == Sliding Window Limiter ==
/// Rate limiter using the sliding window algorithm.
///
/// Each subject maps to a queue of event timestamps, oldest first. A subject
/// is under the limit while its retained count is below the policy's budget;
/// an event recorded at `t` stops counting strictly after `t + window`.
///
/// Every operation reads the clock once; the `*_at` variants take the
/// instant explicitly and are the seam tests use. A `can_proceed` check
/// followed by `record_unchecked` is not atomic across threads; concurrent
/// callers need external locking to make check-and-record a single step.
pub struct SlidingWindowLimiter<S = String> {
    policy: RateLimitPolicy,
    /// Per-subject event timestamps, oldest at the front
    events: HashMap<S, VecDeque<Instant>>,
}

impl<S> SlidingWindowLimiter<S>
where
    S: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a limiter enforcing the given policy.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            events: HashMap::new(),
        }
    }

    /// Returns the enforced policy.
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    // == Can Proceed ==
    /// Checks whether `subject` is currently under the limit.
    ///
    /// Prunes the subject's expired timestamps first; the pruning mutation
    /// is observable through [`count`](Self::count).
    pub fn can_proceed(&mut self, subject: &S) -> bool {
        self.can_proceed_at(subject, Instant::now())
    }

    /// [`can_proceed`](Self::can_proceed) with an explicit "now".
    pub fn can_proceed_at(&mut self, subject: &S, now: Instant) -> bool {
        self.prune(subject, now);
        self.retained(subject) < self.policy.max_events
    }

    // == Record ==
    /// Records an event for `subject` if it is under the limit.
    ///
    /// Re-checks the limit internally, so calling this without a prior
    /// [`can_proceed`](Self::can_proceed) is safe: when over the limit it
    /// appends nothing and returns false. Callers that have already checked
    /// can use [`record_unchecked`](Self::record_unchecked) to skip the
    /// second pass.
    pub fn record(&mut self, subject: &S) -> bool {
        self.record_at(subject, Instant::now())
    }

    /// [`record`](Self::record) with an explicit "now".
    pub fn record_at(&mut self, subject: &S, now: Instant) -> bool {
        if !self.can_proceed_at(subject, now) {
            debug!("event rejected by sliding window limit");
            return false;
        }
        self.record_unchecked_at(subject, now);
        true
    }

    /// Records an event without re-checking the limit.
    ///
    /// For use immediately after a successful [`can_proceed`](Self::can_proceed)
    /// on the same subject. Appending past the budget is possible here and
    /// simply leaves the subject over the limit until events age out.
    pub fn record_unchecked(&mut self, subject: &S) {
        self.record_unchecked_at(subject, Instant::now());
    }

    /// [`record_unchecked`](Self::record_unchecked) with an explicit "now".
    pub fn record_unchecked_at(&mut self, subject: &S, now: Instant) {
        self.events.entry(subject.clone()).or_default().push_back(now);
    }

    // == Time Until Next Allowed ==
    /// Returns how long until `subject` is next allowed to proceed.
    ///
    /// Zero when under the limit. Otherwise the time until the oldest
    /// retained event ages out of the window. Expiry is oldest-first, so
    /// that is exactly when the count drops back under the budget.
    pub fn time_until_next_allowed(&mut self, subject: &S) -> Duration {
        self.time_until_next_allowed_at(subject, Instant::now())
    }

    /// [`time_until_next_allowed`](Self::time_until_next_allowed) with an
    /// explicit "now".
    pub fn time_until_next_allowed_at(&mut self, subject: &S, now: Instant) -> Duration {
        self.prune(subject, now);
        if self.retained(subject) < self.policy.max_events {
            return Duration::ZERO;
        }

        match self.events.get(subject).and_then(|log| log.front().copied()) {
            Some(oldest) => (oldest + self.policy.window).saturating_duration_since(now),
            // Unreachable while max_events >= 1: over the limit implies a
            // retained event. Kept total rather than panicking.
            None => Duration::ZERO,
        }
    }

    // == Count ==
    /// Returns the number of events retained for `subject` in the current
    /// window.
    pub fn count(&mut self, subject: &S) -> usize {
        self.count_at(subject, Instant::now())
    }

    /// [`count`](Self::count) with an explicit "now".
    pub fn count_at(&mut self, subject: &S, now: Instant) -> usize {
        self.prune(subject, now);
        self.retained(subject)
    }

    // == Tracked Subjects ==
    /// Returns the number of subjects currently holding retained events.
    ///
    /// Fully-pruned subjects are dropped from the map, so this tracks active
    /// subjects rather than every subject ever seen.
    pub fn tracked_subjects(&self) -> usize {
        self.events.len()
    }

    // == Internal ==
    fn retained(&self, subject: &S) -> usize {
        self.events.get(subject).map_or(0, |log| log.len())
    }

    /// Drops the subject's timestamps that have left the window.
    ///
    /// An event at `t` is retained iff `t > now - window`. `checked_sub`
    /// guards the case where the window reaches past the earliest
    /// representable instant, in which case nothing can have expired yet.
    fn prune(&mut self, subject: &S, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.policy.window) else {
            return;
        };
        if let Some(log) = self.events.get_mut(subject) {
            while log.front().is_some_and(|&t| t <= cutoff) {
                log.pop_front();
            }
            if log.is_empty() {
                self.events.remove(subject);
            }
        }
    }
}
