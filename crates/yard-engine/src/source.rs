//! Occupancy sources -- how each record family contributes slot fills.
//!
//! All three families share one shape: gate on status, test the target day
//! against the record's window, then fill a slot range on one or more yards.
//! [`PROCESSING_ORDER`] fixes the sequence the engine applies them in; since
//! fills overwrite, a later source's reason wins on shared slots.

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};
use crate::grid::{OccupancyGrid, Reason};
use crate::records::{BookingStatus, LockRecord, OnetimeBooking, RecurringBooking, WeekdayNumber};
use crate::slot::{duration_to_slots, time_to_slot};

/// Order in which sources are written into the grid. Last writer wins.
pub const PROCESSING_ORDER: [Reason; 3] = [Reason::Locked, Reason::Scheduled, Reason::Onetime];

impl Reason {
    /// Position of this reason in [`PROCESSING_ORDER`]; higher overwrites lower.
    pub fn precedence(&self) -> usize {
        PROCESSING_ORDER
            .iter()
            .position(|r| r == self)
            .unwrap_or(PROCESSING_ORDER.len())
    }
}

/// The single calendar date a computation is evaluated for, in a fixed timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDay {
    date: NaiveDate,
    tz: Tz,
    weekday: WeekdayNumber,
    key: String,
}

impl TargetDay {
    pub fn new(date: NaiveDate, tz: Tz) -> Self {
        Self {
            date,
            tz,
            weekday: date.weekday().number_from_monday() as WeekdayNumber,
            key: date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Today's date as seen in `tz`.
    pub fn today(tz: Tz) -> Self {
        Self::new(Utc::now().with_timezone(&tz).date_naive(), tz)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Monday = 1 .. Sunday = 7.
    pub fn weekday(&self) -> WeekdayNumber {
        self.weekday
    }

    /// `YYYY-MM-DD`, the form skip dates are keyed by.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn within(&self, first: NaiveDate, last: NaiveDate) -> bool {
        first <= self.date && self.date <= last
    }

    fn recurs_on(&self, days: &[WeekdayNumber]) -> bool {
        days.contains(&self.weekday)
    }
}

/// Parse an IANA timezone name such as `Asia/Ho_Chi_Minh`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

/// One slot range to occupy on one yard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill<'a> {
    pub yard: &'a str,
    pub start: i32,
    pub count: i64,
}

/// A record family that can occupy grid slots.
pub trait OccupancySource {
    /// Reason recorded on every slot this source fills.
    const REASON: Reason;

    /// Every yard this record references, whether or not it applies on a given day.
    fn yard_ids(&self) -> Vec<&str>;

    /// Slot ranges this record occupies on `day`; empty when it does not apply.
    fn fills(&self, day: &TargetDay) -> Vec<Fill<'_>>;
}

impl OccupancySource for LockRecord {
    const REASON: Reason = Reason::Locked;

    fn yard_ids(&self) -> Vec<&str> {
        self.service_name.iter().map(String::as_str).collect()
    }

    fn fills(&self, day: &TargetDay) -> Vec<Fill<'_>> {
        let tz = day.tz();
        let first = self.start_time.with_timezone(&tz).date_naive();
        let last = self.end_time.with_timezone(&tz).date_naive();

        if !day.within(first, last)
            || !day.recurs_on(&self.frequency)
            || self.skip_dates.iter().any(|d| d == day.key())
        {
            return Vec::new();
        }

        let start = time_to_slot(self.start_time, tz);
        let end = time_to_slot(self.end_time, tz);
        let count = i64::from(end - start);

        self.service_name
            .iter()
            .map(|yard| Fill {
                yard: yard.as_str(),
                start,
                count,
            })
            .collect()
    }
}

impl OccupancySource for RecurringBooking {
    const REASON: Reason = Reason::Scheduled;

    fn yard_ids(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.service_name.as_str()).collect()
    }

    fn fills(&self, day: &TargetDay) -> Vec<Fill<'_>> {
        if self.status != BookingStatus::Confirmed {
            return Vec::new();
        }
        let tz = day.tz();

        self.services
            .iter()
            .filter(|service| {
                day.within(service.start_date.local_date(tz), service.end_date.local_date(tz))
                    && day.recurs_on(&service.frequently)
                    && service.skip_dates.get(day.key()) != Some(&true)
            })
            .map(|service| Fill {
                yard: service.service_name.as_str(),
                start: service.start_time.slot(tz),
                count: duration_to_slots(service.duration),
            })
            .collect()
    }
}

impl OccupancySource for OnetimeBooking {
    const REASON: Reason = Reason::Onetime;

    fn yard_ids(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.service_name.as_str()).collect()
    }

    fn fills(&self, day: &TargetDay) -> Vec<Fill<'_>> {
        let tz = day.tz();
        if self.status != BookingStatus::Confirmed || self.time.local_date(tz) != day.date() {
            return Vec::new();
        }

        self.services
            .iter()
            .map(|service| Fill {
                yard: service.service_name.as_str(),
                start: service.start_time.slot(tz),
                count: duration_to_slots(service.duration),
            })
            .collect()
    }
}

/// Counts from applying one source family to a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub fills: usize,
    pub slots_written: usize,
}

/// Write every fill from `records` into `grid` with the family's reason.
pub fn apply<S: OccupancySource>(
    grid: &mut OccupancyGrid,
    records: &[S],
    day: &TargetDay,
) -> ApplyStats {
    let reason = S::REASON;
    let mut stats = ApplyStats::default();
    for record in records {
        for fill in record.fills(day) {
            stats.fills += 1;
            stats.slots_written += grid.fill(fill.yard, fill.start, fill.count, reason);
        }
    }
    tracing::debug!(
        reason = %reason,
        records = records.len(),
        fills = stats.fills,
        slots_written = stats.slots_written,
        "applied occupancy source",
    );
    stats
}
