//! Source of "now" for countdowns and widget timelines.

use chrono::{DateTime, FixedOffset, Local, Utc};

/// Clock trait so countdowns can be computed against a frozen time in tests.
pub trait Clock: Send + Sync {
    /// Current UTC instant.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current instant in the device's local time zone.
    fn now_local(&self) -> DateTime<Local> {
        self.now_utc().with_timezone(&Local)
    }

    /// Current instant at a fixed UTC offset.
    fn now_at(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        self.now_utc().with_timezone(&offset)
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock for deterministic tests.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone)]
pub struct MockClock {
    now: DateTime<Utc>,
}

#[cfg(any(test, feature = "test-seams"))]
impl MockClock {
    /// Freeze the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Freeze the clock at an RFC 3339 timestamp.
    pub fn from_rfc3339(s: &str) -> Self {
        Self {
            now: DateTime::parse_from_rfc3339(s)
                .expect("valid RFC 3339")
                .with_timezone(&Utc),
        }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, duration: chrono::Duration) {
        self.now += duration;
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_system_clock_is_recent() {
        assert!(SystemClock.now_utc().year() >= 2025);
    }

    #[test]
    fn test_mock_clock_is_frozen() {
        let clock = MockClock::from_rfc3339("2026-03-01T09:30:00Z");
        assert_eq!(clock.now_utc(), clock.now_utc());
        assert_eq!(clock.now_utc().to_rfc3339(), "2026-03-01T09:30:00+00:00");
    }

    #[test]
    fn test_mock_clock_advances() {
        let mut clock = MockClock::from_rfc3339("2026-03-01T09:30:00Z");
        clock.advance(chrono::Duration::minutes(45));
        assert_eq!(clock.now_utc().to_rfc3339(), "2026-03-01T10:15:00+00:00");
    }

    #[test]
    fn test_now_local_is_same_instant() {
        let clock = MockClock::from_rfc3339("2026-03-01T20:00:00Z");
        assert_eq!(clock.now_local().with_timezone(&Utc), clock.now_utc());
    }

    #[test]
    fn test_now_at_offset() {
        let clock = MockClock::from_rfc3339("2026-03-01T20:00:00Z");
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        let local = clock.now_at(seoul);
        assert_eq!(local.day(), 2);
        assert_eq!(local.hour(), 5);
    }
}
