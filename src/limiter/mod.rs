//! Rate Limiter Module
//!
//! Per-subject sliding-window rate limiting with exact wait-time reporting.

mod window;

// Re-export public types
pub use window::{RateLimitPolicy, SlidingWindowLimiter};
