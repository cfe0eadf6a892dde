//! Configuration Module
//!
//! Handles loading cache and rate-limiter configuration from environment
//! variables.

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::limiter::RateLimitPolicy;

/// Configuration parameters for the cache and the rate limiter.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub cache_capacity: usize,
    /// Sliding window length in seconds
    pub window_secs: f64,
    /// Maximum events allowed per subject per window
    pub max_events: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `RATE_WINDOW_SECS` - Sliding window in seconds (default: 10.0)
    /// - `RATE_MAX_EVENTS` - Events allowed per window (default: 1)
    pub fn from_env() -> Self {
        Self {
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            window_secs: env::var("RATE_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10.0),
            max_events: env::var("RATE_MAX_EVENTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }

    /// Validates the configuration, rejecting degenerate values up front.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        if !self.window_secs.is_finite() || self.window_secs <= 0.0 {
            return Err(Error::InvalidWindow);
        }
        if self.max_events == 0 {
            return Err(Error::InvalidLimit);
        }
        Ok(())
    }

    /// Builds a validated rate-limit policy from the configured window and
    /// event budget.
    pub fn rate_policy(&self) -> Result<RateLimitPolicy> {
        // Duration::from_secs_f64 panics on negative or non-finite input
        if !self.window_secs.is_finite() || self.window_secs <= 0.0 {
            return Err(Error::InvalidWindow);
        }
        RateLimitPolicy::new(Duration::from_secs_f64(self.window_secs), self.max_events)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            window_secs: 10.0,
            max_events: 1,
        }
    }
}
