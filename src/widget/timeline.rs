//! Minute-by-minute timeline rendered by the widget extension.

use crate::countdown::{time_left, CountdownDisplay, DDayLabel};
use crate::policy::GatePolicy;
use crate::store::events::CountdownEvent;
use crate::GateError;
use chrono::{DateTime, Duration, FixedOffset};

/// Entries per timeline refresh.
pub const TIMELINE_ENTRIES: usize = 60;

/// Spacing between entries.
pub const ENTRY_INTERVAL_MINUTES: i64 = 1;

/// One widget frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    /// When this frame becomes current.
    pub date: DateTime<FixedOffset>,
    /// Countdown as of `date`, seconds gated.
    pub display: CountdownDisplay,
    /// D-day badge as of `date`.
    pub label: DDayLabel,
}

/// Build the next hour of frames for `event`, starting at `now`.
///
/// Event dates without an offset are read in `now`'s offset.
pub fn build_timeline<P: GatePolicy + ?Sized>(
    policy: &P,
    event: &CountdownEvent,
    now: DateTime<FixedOffset>,
    purchase_state: bool,
    wants_seconds: bool,
) -> Result<Vec<TimelineEntry>, GateError> {
    let target = event.target_in(&now.timezone())?;

    let entries = (0..TIMELINE_ENTRIES as i64)
        .map(|offset| {
            let date = now + Duration::minutes(offset * ENTRY_INTERVAL_MINUTES);
            let left = time_left(&date, &target);
            TimelineEntry {
                date,
                display: CountdownDisplay::gated(left, policy, purchase_state, wants_seconds),
                label: left.label(),
            }
        })
        .collect();

    Ok(entries)
}
