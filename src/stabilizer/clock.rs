//! Time sources for the stabilizer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;

/// Source of time for debouncing and record timestamps.
pub trait Clock {
    /// Monotonic time elapsed since the clock was created.
    fn now(&self) -> Duration;

    /// Wall-clock time as unix seconds, stamped on published records.
    fn unix_timestamp(&self) -> i64;
}

/// Clock backed by `Instant` and the system wall clock.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose `now` counts from this call.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn unix_timestamp(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually driven clock for replaying recorded timelines and for tests.
///
/// Clones share the same time, so a test can keep one handle and move the
/// other into the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
    unix_origin: i64,
}

impl ManualClock {
    /// Create a clock at zero with a unix origin of zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock whose `unix_timestamp` starts at `unix_origin` seconds.
    pub fn starting_at(unix_origin: i64) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(0)),
            unix_origin,
        }
    }

    /// Move the clock to `t`. Saturates at roughly 584 years.
    pub fn set(&self, t: Duration) {
        self.nanos.store(saturating_nanos(t), Ordering::SeqCst);
    }

    /// Move the clock to `secs` seconds.
    ///
    /// # Panics
    /// If `secs` is negative, NaN or does not fit a `Duration`.
    pub fn set_secs(&self, secs: f64) {
        self.set(Duration::from_secs_f64(secs));
    }

    /// Move the clock forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        let dt = saturating_nanos(dt);
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_add(dt))
            });
    }
}

fn saturating_nanos(t: Duration) -> u64 {
    u64::try_from(t.as_nanos()).unwrap_or(u64::MAX)
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn unix_timestamp(&self) -> i64 {
        self.unix_origin + self.now().as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::starting_at(1_700_000_000);
        let handle = clock.clone();

        handle.set_secs(1.5);
        assert_eq!(clock.now(), Duration::from_millis(1500));
        assert_eq!(clock.unix_timestamp(), 1_700_000_001);

        handle.advance(Duration::from_secs(2));
        assert_eq!(clock.now(), Duration::from_millis(3500));
        assert_eq!(clock.unix_timestamp(), 1_700_000_003);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(clock.unix_timestamp() > 0);
    }
}
