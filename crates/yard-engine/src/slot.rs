//! Slot arithmetic -- conversions between clock time, durations and slot indices.
//!
//! A day is split into [`SLOTS_PER_DAY`] half-hour slots; slot `i` covers
//! `i * 30` to `i * 30 + 30` minutes after local midnight.

use std::ops::Range;

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};

/// Number of half-hour slots in one day.
pub const SLOTS_PER_DAY: usize = 48;

/// Length of one slot in minutes.
pub const SLOT_MINUTES: i64 = 30;

/// Slot index containing the local wall-clock time of `timestamp` in `tz`.
///
/// No clamping is done here; callers get `hour * 2 + minute / 30` as-is and
/// the grid clamps at fill time.
pub fn time_to_slot(timestamp: DateTime<Utc>, tz: Tz) -> i32 {
    clock_to_slot(timestamp.with_timezone(&tz).time())
}

/// Slot index containing a bare clock time.
pub fn clock_to_slot(time: NaiveTime) -> i32 {
    (time.hour() * 2 + time.minute() / SLOT_MINUTES as u32) as i32
}

/// Number of slots needed to cover `minutes`, rounded up.
///
/// Zero and negative durations yield a non-positive count, which fills nothing.
pub fn duration_to_slots(minutes: i64) -> i64 {
    if minutes > 0 {
        (minutes - 1) / SLOT_MINUTES + 1
    } else {
        // Truncating division rounds toward zero, i.e. up for negatives.
        minutes / SLOT_MINUTES
    }
}

/// Format a slot index as its `HH:MM` start time.
///
/// Indices past the end of the day are not wrapped (`48` formats as `24:00`),
/// which is what the "end of range" label of the last slot needs.
pub fn slot_to_time(index: usize) -> String {
    let hour = index / 2;
    let minute = (index % 2) as i64 * SLOT_MINUTES;
    format!("{:02}:{:02}", hour, minute)
}

/// `HH:MM` labels for every slot in `range`.
pub fn time_labels(range: Range<usize>) -> Vec<String> {
    range.map(slot_to_time).collect()
}

/// Parse an `HH:MM` or `HH:MM:SS` clock string.
pub fn parse_clock(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| EngineError::InvalidClock(s.to_string()))
}

/// Half-open slot range between two clock strings.
///
/// `to` may be `24:00` for a range running to the end of the day. Empty and
/// reversed ranges are rejected.
pub fn slot_range(from: &str, to: &str) -> Result<Range<usize>> {
    let start = clock_to_slot(parse_clock(from)?) as usize;
    let end = match to {
        "24:00" | "24:00:00" => SLOTS_PER_DAY,
        _ => clock_to_slot(parse_clock(to)?) as usize,
    };
    if end <= start {
        return Err(EngineError::InvalidRange {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    Ok(start..end)
}

