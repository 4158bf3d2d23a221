//! Time Provider Abstraction
//!
//! Block timestamps (`created_at`, `updated_at`) are taken from a
//! `TimeProvider` so the editing engine can be driven by a manual clock in
//! tests and replays.
//!
//! # Examples
//!
//! ```rust
//! use summanote_core::models::time::{ManualClock, TimeProvider};
//! use chrono::Duration;
//!
//! let clock = ManualClock::default();
//! let t1 = clock.now();
//! clock.advance(Duration::seconds(5));
//! assert_eq!(clock.now() - t1, Duration::seconds(5));
//! ```

use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Trait for providing current time
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// System time provider using the actual system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
///
/// Shared behind `Arc<dyn TimeProvider>`, so mutation goes through `&self`.
#[derive(Debug)]
pub struct ManualClock {
    current_time: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn with_time(time: DateTime<Utc>) -> Self {
        Self {
            current_time: Mutex::new(time),
        }
    }

    pub fn set_time(&self, time: DateTime<Utc>) {
        *self.lock() = time;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        *self.lock() += duration;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        // A poisoned clock still holds a valid timestamp
        self.current_time
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::with_time(Utc::now())
    }
}

impl TimeProvider for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_system_time_provider() {
        let provider = SystemTimeProvider;
        let now1 = provider.now();
        let now2 = Utc::now();

        assert!((now2 - now1).num_milliseconds().abs() < 1000);
    }

    #[test]
    fn test_manual_clock_with_time() {
        let specific_time = Utc::now() - Duration::days(7);
        let clock = ManualClock::with_time(specific_time);

        assert_eq!(clock.now(), specific_time);
    }

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::default();
        let new_time = Utc::now() + Duration::hours(3);

        clock.set_time(new_time);
        assert_eq!(clock.now(), new_time);

        clock.advance(Duration::minutes(30));
        assert_eq!(clock.now() - new_time, Duration::minutes(30));
    }

    #[test]
    fn test_manual_clock_does_not_drift() {
        let clock = ManualClock::default();
        let first = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(clock.now(), first);
    }
}
