//! Per-client fixed-window request counter.

use std::time::{Duration, SystemTime};

use dashmap::DashMap;

use crate::clock::{epoch_secs_ceil, secs_until_ceil};

/// Window length and request cap of one limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterConfig {
    /// Length of one fixed window.
    pub window: Duration,
    /// Requests admitted per key per window. Must be non-zero.
    pub max_requests: u32,
}

impl LimiterConfig {
    pub const fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            window,
            max_requests,
        }
    }

    /// 100 requests per 15 minutes.
    pub const fn general() -> Self {
        Self::new(100, Duration::from_secs(15 * 60))
    }

    /// 10 saves per minute.
    pub const fn save() -> Self {
        Self::new(10, Duration::from_secs(60))
    }

    /// 5 deletes per minute.
    pub const fn delete() -> Self {
        Self::new(5, Duration::from_secs(60))
    }
}

/// Outcome of a limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitResult {
    pub allowed: bool,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// When the current window resets.
    pub window_end: SystemTime,
}

impl LimitResult {
    /// Whole seconds until the window resets, rounded up.
    pub fn reset_after_secs(&self, now: SystemTime) -> u64 {
        secs_until_ceil(self.window_end, now)
    }

    /// Absolute reset time in epoch seconds, rounded up.
    pub fn reset_epoch_secs(&self) -> u64 {
        epoch_secs_ceil(self.window_end)
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    count: u32,
    window_end: SystemTime,
}

impl WindowRecord {
    fn fresh(now: SystemTime, window: Duration) -> Self {
        Self {
            count: 0,
            window_end: now + window,
        }
    }

    fn is_expired(&self, now: SystemTime) -> bool {
        now > self.window_end
    }
}

/// Fixed-window limiter keyed by client identity.
///
/// Each key gets `max_requests` admissions per window. The window starts
/// on the key's first request and resets completely once it has passed,
/// so up to twice the cap can get through around a window boundary.
///
/// Records live in a [`DashMap`]; check-and-increment runs under the
/// entry's shard lock, so concurrent checks for one key never over-admit.
pub struct FixedWindowLimiter {
    config: LimiterConfig,
    records: DashMap<String, WindowRecord>,
}

impl FixedWindowLimiter {
    pub fn new(config: LimiterConfig) -> Self {
        Self {
            config,
            records: DashMap::new(),
        }
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Checks `key` against the limit and, if admitted, reserves one slot.
    ///
    /// An absent or expired record is replaced by a new window starting at
    /// `now`. Denied requests leave the count untouched.
    pub fn check_limit(&self, key: &str, now: SystemTime) -> LimitResult {
        let window = self.config.window;
        let mut record = self
            .records
            .entry(key.to_string())
            .or_insert_with(|| WindowRecord::fresh(now, window));

        if record.is_expired(now) {
            *record = WindowRecord::fresh(now, window);
        }

        let allowed = record.count < self.config.max_requests;
        if allowed {
            record.count += 1;
        }

        LimitResult {
            allowed,
            remaining: self.config.max_requests.saturating_sub(record.count),
            window_end: record.window_end,
        }
    }

    /// Reports what the next check for `key` would see, without touching
    /// any record.
    ///
    /// `allowed` tells whether a request made now would be admitted. A key
    /// with no live window reports a full quota and a window that would
    /// start at `now`.
    pub fn peek(&self, key: &str, now: SystemTime) -> LimitResult {
        let live = self
            .records
            .get(key)
            .map(|r| *r)
            .filter(|r| !r.is_expired(now))
            .unwrap_or_else(|| WindowRecord::fresh(now, self.config.window));

        LimitResult {
            allowed: live.count < self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(live.count),
            window_end: live.window_end,
        }
    }

    /// Drops every record whose window has passed. Returns how many were removed.
    ///
    /// Expired records already behave as absent in [`check_limit`](Self::check_limit),
    /// so this only reclaims memory.
    pub fn sweep(&self, now: SystemTime) -> usize {
        let mut removed = 0;
        self.records.retain(|_, record| {
            let keep = !record.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Number of tracked keys, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
