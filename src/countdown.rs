//! Countdown arithmetic and the gated countdown display.
//!
//! `days` counts calendar days with both instants read in `now`'s time zone,
//! so an event later today is D-DAY even if it is hours away. Hours, minutes and seconds are
//! the remainder of the exact difference and are zeroed once the target has
//! passed.

use crate::policy::GatePolicy;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time remaining until an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLeft {
    /// Calendar days until the target date; negative once it has passed.
    pub days: i64,
    /// Hours past whole days, 0 once past.
    pub hours: i64,
    /// Minutes past whole hours, 0 once past.
    pub minutes: i64,
    /// Seconds past whole minutes, 0 once past.
    pub seconds: i64,
    /// Whether the target instant is behind `now`.
    pub is_past: bool,
}

impl TimeLeft {
    /// Whether the target falls on today's date.
    pub fn is_d_day(&self) -> bool {
        self.days == 0
    }

    /// Card label for this countdown.
    pub fn label(&self) -> DDayLabel {
        match self.days {
            0 => DDayLabel::DDay,
            d if d < 0 => DDayLabel::Ended,
            d => DDayLabel::Remaining(d),
        }
    }
}

/// D-day badge shown on an event card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DDayLabel {
    /// The event is today.
    DDay,
    /// Days still to go.
    Remaining(i64),
    /// The event date is behind us.
    Ended,
}

impl fmt::Display for DDayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DDay => f.pad("D-DAY"),
            Self::Remaining(days) => write!(f, "D-{}", days),
            Self::Ended => f.pad("ENDED"),
        }
    }
}

/// Compute the time left from `now` until `target`.
///
/// Both instants are compared in `now`'s time zone.
pub fn time_left<Tz: TimeZone, Tz2: TimeZone>(
    now: &DateTime<Tz>,
    target: &DateTime<Tz2>,
) -> TimeLeft {
    let target = target.with_timezone(&now.timezone());
    let diff_ms = target
        .clone()
        .signed_duration_since(now.clone())
        .num_milliseconds();
    let is_past = diff_ms < 0;

    let days = target
        .date_naive()
        .signed_duration_since(now.date_naive())
        .num_days();

    if is_past {
        return TimeLeft {
            days,
            hours: 0,
            minutes: 0,
            seconds: 0,
            is_past,
        };
    }

    TimeLeft {
        days,
        hours: (diff_ms % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (diff_ms % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (diff_ms % MS_PER_MINUTE) / MS_PER_SECOND,
        is_past,
    }
}

/// A countdown ready for display, with seconds withheld unless allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownDisplay {
    /// Days until the event.
    pub days: i64,
    /// Hours component.
    pub hours: i64,
    /// Minutes component.
    pub minutes: i64,
    /// Seconds component, `None` when hidden.
    pub seconds: Option<i64>,
}

impl CountdownDisplay {
    /// Apply the seconds gate to a countdown.
    ///
    /// Seconds appear only when the policy allows them for `purchase_state`,
    /// the user asked for them, and the event has not passed.
    pub fn gated<P: GatePolicy + ?Sized>(
        time_left: TimeLeft,
        policy: &P,
        purchase_state: bool,
        wants_seconds: bool,
    ) -> Self {
        let show_seconds =
            wants_seconds && !time_left.is_past && policy.can_show_seconds(purchase_state);
        Self {
            days: time_left.days,
            hours: time_left.hours,
            minutes: time_left.minutes,
            seconds: show_seconds.then_some(time_left.seconds),
        }
    }
}

impl fmt::Display for CountdownDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {:02}:{:02}", self.days, self.hours, self.minutes)?;
        if let Some(seconds) = self.seconds {
            write!(f, ":{:02}", seconds)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::gate::FeatureGate;
    use crate::policy::mode::FeatureMode;
    use chrono::{FixedOffset, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_future_breakdown() {
        let now = utc("2026-03-01T10:00:00Z");
        let target = utc("2026-03-04T13:25:42Z");
        let left = time_left(&now, &target);
        assert_eq!(left.days, 3);
        assert_eq!(left.hours, 3);
        assert_eq!(left.minutes, 25);
        assert_eq!(left.seconds, 42);
        assert!(!left.is_past);
        assert_eq!(left.label().to_string(), "D-3");
    }

    #[test]
    fn test_days_count_calendar_dates() {
        // 23:00 to 01:00 next day is two hours but one calendar day.
        let now = utc("2026-03-01T23:00:00Z");
        let target = utc("2026-03-02T01:00:00Z");
        let left = time_left(&now, &target);
        assert_eq!(left.days, 1);
        assert_eq!(left.hours, 2);
    }

    #[test]
    fn test_same_day_is_d_day() {
        let now = utc("2026-03-01T08:00:00Z");
        let target = utc("2026-03-01T20:30:00Z");
        let left = time_left(&now, &target);
        assert!(left.is_d_day());
        assert_eq!(left.hours, 12);
        assert_eq!(left.minutes, 30);
        assert_eq!(left.label(), DDayLabel::DDay);
    }

    #[test]
    fn test_earlier_today_is_d_day_with_zero_clock() {
        let now = utc("2026-03-01T20:00:00Z");
        let target = utc("2026-03-01T08:00:00Z");
        let left = time_left(&now, &target);
        assert!(left.is_past);
        assert_eq!(left.days, 0);
        assert_eq!((left.hours, left.minutes, left.seconds), (0, 0, 0));
    }

    #[test]
    fn test_past_days_are_negative() {
        let now = utc("2026-03-05T12:00:00Z");
        let target = utc("2026-03-03T12:00:00Z");
        let left = time_left(&now, &target);
        assert_eq!(left.days, -2);
        assert_eq!(left.label(), DDayLabel::Ended);
        assert_eq!(left.label().to_string(), "ENDED");
    }

    #[test]
    fn test_days_use_now_time_zone() {
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        // 2026-03-01 20:00 UTC is already 2026-03-02 in Seoul.
        let now = utc("2026-03-01T20:00:00Z").with_timezone(&seoul);
        let target = utc("2026-03-02T02:00:00Z");
        assert_eq!(time_left(&now, &target).days, 0);
        assert_eq!(time_left(&utc("2026-03-01T20:00:00Z"), &target).days, 1);
    }

    #[test]
    fn test_gated_display_hides_seconds_for_free() {
        let now = utc("2026-03-01T10:00:00Z");
        let target = utc("2026-03-01T10:01:05Z");
        let left = time_left(&now, &target);
        let gate = FeatureGate::new(FeatureMode::Normal);

        let free = CountdownDisplay::gated(left, &gate, false, true);
        assert_eq!(free.seconds, None);
        assert_eq!(free.to_string(), "0d 00:01");

        let pro = CountdownDisplay::gated(left, &gate, true, true);
        assert_eq!(pro.seconds, Some(5));
        assert_eq!(pro.to_string(), "0d 00:01:05");

        let pro_opted_out = CountdownDisplay::gated(left, &gate, true, false);
        assert_eq!(pro_opted_out.seconds, None);
    }

    #[test]
    fn test_past_event_never_shows_seconds() {
        let now = utc("2026-03-05T12:00:00Z");
        let target = utc("2026-03-01T12:00:00Z");
        let left = time_left(&now, &target);
        let gate = FeatureGate::new(FeatureMode::Pro);

        let display = CountdownDisplay::gated(left, &gate, true, true);
        assert_eq!(display.seconds, None);
        assert_eq!(display.to_string(), "-4d 00:00");
    }
}
