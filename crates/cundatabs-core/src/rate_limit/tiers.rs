//! The three independently stateful limiters guarding the server's routes.

use std::fmt;
use std::time::SystemTime;

use super::limiter::{FixedWindowLimiter, LimitResult, LimiterConfig};

/// A class of routes with its own limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Every request.
    General,
    /// Tablature creation.
    Save,
    /// Tablature deletion.
    Delete,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::General, Tier::Save, Tier::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::General => "general",
            Tier::Save => "save",
            Tier::Delete => "delete",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of one client's standing in every tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierStatus {
    pub general: LimitResult,
    pub save: LimitResult,
    pub delete: LimitResult,
}

/// General, save and delete limiters. Built once at startup and shared.
pub struct RateLimitTiers {
    general: FixedWindowLimiter,
    save: FixedWindowLimiter,
    delete: FixedWindowLimiter,
}

impl RateLimitTiers {
    pub fn new(general: LimiterConfig, save: LimiterConfig, delete: LimiterConfig) -> Self {
        Self {
            general: FixedWindowLimiter::new(general),
            save: FixedWindowLimiter::new(save),
            delete: FixedWindowLimiter::new(delete),
        }
    }

    pub fn limiter(&self, tier: Tier) -> &FixedWindowLimiter {
        match tier {
            Tier::General => &self.general,
            Tier::Save => &self.save,
            Tier::Delete => &self.delete,
        }
    }

    pub fn check(&self, tier: Tier, key: &str, now: SystemTime) -> LimitResult {
        self.limiter(tier).check_limit(key, now)
    }

    /// Peeks every tier for `key`. Consumes no quota.
    pub fn status(&self, key: &str, now: SystemTime) -> TierStatus {
        TierStatus {
            general: self.general.peek(key, now),
            save: self.save.peek(key, now),
            delete: self.delete.peek(key, now),
        }
    }

    /// Sweeps every tier. Returns the total number of records removed.
    pub fn sweep(&self, now: SystemTime) -> usize {
        Tier::ALL
            .iter()
            .map(|&tier| self.limiter(tier).sweep(now))
            .sum()
    }

    /// Number of tracked keys across all tiers.
    pub fn tracked_keys(&self) -> usize {
        Tier::ALL.iter().map(|&tier| self.limiter(tier).len()).sum()
    }
}

impl Default for RateLimitTiers {
    fn default() -> Self {
        Self::new(
            LimiterConfig::general(),
            LimiterConfig::save(),
            LimiterConfig::delete(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn tiers_hold_independent_state() {
        let tiers = RateLimitTiers::default();
        let now = at(1_000);

        for _ in 0..10 {
            assert!(tiers.check(Tier::Save, "1.2.3.4", now).allowed);
        }
        assert!(!tiers.check(Tier::Save, "1.2.3.4", now).allowed);

        let general = tiers.check(Tier::General, "1.2.3.4", now);
        assert!(general.allowed);
        assert_eq!(general.remaining, 99);
        assert_eq!(tiers.status("1.2.3.4", now).delete.remaining, 5);
    }

    #[test]
    fn status_reports_every_tier_without_consuming() {
        let tiers = RateLimitTiers::default();
        let now = at(50);
        tiers.check(Tier::General, "k", now);
        tiers.check(Tier::Delete, "k", now);

        let first = tiers.status("k", now);
        let second = tiers.status("k", now);
        assert_eq!(first, second);
        assert_eq!(first.general.remaining, 99);
        assert_eq!(first.save.remaining, 10);
        assert_eq!(first.delete.remaining, 4);
        assert_eq!(first.general.reset_after_secs(now), 900);
        assert_eq!(tiers.tracked_keys(), 2);
    }

    #[test]
    fn sweep_covers_all_tiers() {
        let tiers = RateLimitTiers::default();
        for tier in Tier::ALL {
            tiers.check(tier, "k", at(0));
        }
        assert_eq!(tiers.sweep(at(61)), 2);
        assert_eq!(tiers.tracked_keys(), 1);
        assert_eq!(tiers.sweep(at(901)), 1);
    }

    #[test]
    fn limiter_exposes_tier_config() {
        let save = LimiterConfig::new(3, Duration::from_secs(30));
        let tiers = RateLimitTiers::new(LimiterConfig::general(), save, LimiterConfig::delete());

        assert_eq!(*tiers.limiter(Tier::Save).config(), save);
        assert_eq!(*tiers.limiter(Tier::General).config(), LimiterConfig::general());
        assert_eq!(tiers.limiter(Tier::Delete).config().max_requests, 5);
    }

    #[test]
    fn tier_names() {
        assert_eq!(Tier::General.to_string(), "general");
        assert_eq!(Tier::Save.as_str(), "save");
        assert_eq!(Tier::Delete.as_str(), "delete");
    }
}
