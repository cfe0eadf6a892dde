//! Cachegate - bounded caching and rate limiting primitives
//!
//! Provides a fixed-capacity LRU cache with predicate invalidation, a
//! sliding-window rate limiter, and the two services built on them:
//! memoized range-sum queries and per-user message gating.

pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod limiter;
pub mod rangesum;

pub use cache::{BoundedCache, CacheStats};
pub use config::Config;
pub use error::{Error, Result};
pub use gate::{GateDecision, GateStats, MessageGate};
pub use limiter::{RateLimitPolicy, SlidingWindowLimiter};
pub use rangesum::RangeSumService;
