//! Per-client fixed-window rate limiting.
//!
//! - [`limiter`]: the [`FixedWindowLimiter`] counter and its [`LimitResult`].
//! - [`tiers`]: the general/save/delete limiter set ([`RateLimitTiers`]).
//! - [`client_key`]: caller identity derived from proxy headers.

pub mod client_key;
pub mod limiter;
pub mod tiers;

pub use client_key::{client_key, UNKNOWN_CLIENT};
pub use limiter::{FixedWindowLimiter, LimitResult, LimiterConfig};
pub use tiers::{RateLimitTiers, Tier, TierStatus};
