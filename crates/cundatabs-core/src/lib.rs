//! CundaTabs core library: HTTP-agnostic logic for the tablature server.
//!
//! # Modules
//!
//! - [`rate_limit`]: per-client fixed-window limiters, the general/save/delete
//!   tier set, and client identity derivation.
//! - [`tabs`]: tablature documents and the directory-backed [`TabStore`].
//! - [`clock`]: the [`Clock`] time source and epoch/second rounding helpers.
//! - [`error`]: unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod clock;
pub mod error;
pub mod rate_limit;
pub mod tabs;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use rate_limit::{
    client_key, FixedWindowLimiter, LimitResult, LimiterConfig, RateLimitTiers, Tier, TierStatus,
    UNKNOWN_CLIENT,
};
pub use tabs::{SavedTab, TabData, TabStore};
