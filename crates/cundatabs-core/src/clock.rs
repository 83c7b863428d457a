//! Time source abstraction.
//!
//! Rate limiting decisions take the current time as an explicit argument.
//! Long-lived components hold a [`Clock`] so tests can substitute a
//! [`ManualClock`] and step through windows without sleeping.

use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Starts the clock at `millis` after the Unix epoch.
    pub fn at_millis(millis: u64) -> Self {
        Self::new(UNIX_EPOCH + Duration::from_millis(millis))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Whole seconds from `now` until `until`, rounded up. Zero if `until` has passed.
pub fn secs_until_ceil(until: SystemTime, now: SystemTime) -> u64 {
    let remaining = until.duration_since(now).unwrap_or_default();
    ceil_secs(remaining)
}

/// Seconds since the Unix epoch, rounded up.
pub fn epoch_secs_ceil(at: SystemTime) -> u64 {
    ceil_secs(at.duration_since(UNIX_EPOCH).unwrap_or_default())
}

/// Milliseconds since the Unix epoch.
pub fn epoch_millis(at: SystemTime) -> u128 {
    at.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

fn ceil_secs(d: Duration) -> u64 {
    if d.subsec_nanos() > 0 {
        d.as_secs() + 1
    } else {
        d.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::at_millis(1_000);
        clock.advance(Duration::from_millis(500));
        assert_eq!(epoch_millis(clock.now()), 1_500);
    }

    #[test]
    fn secs_until_rounds_up() {
        let now = UNIX_EPOCH + Duration::from_millis(1_000);
        let until = now + Duration::from_millis(1_001);
        assert_eq!(secs_until_ceil(until, now), 2);
        assert_eq!(secs_until_ceil(now + Duration::from_secs(60), now), 60);
    }

    #[test]
    fn secs_until_past_is_zero() {
        let now = UNIX_EPOCH + Duration::from_secs(100);
        assert_eq!(secs_until_ceil(now - Duration::from_secs(5), now), 0);
    }

    #[test]
    fn epoch_secs_rounds_up() {
        assert_eq!(epoch_secs_ceil(UNIX_EPOCH + Duration::from_millis(61_001)), 62);
        assert_eq!(epoch_secs_ceil(UNIX_EPOCH + Duration::from_secs(61)), 61);
    }
}
