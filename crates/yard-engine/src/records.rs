//! Lock and booking records as delivered (already decrypted) by the retrieval layer.
//!
//! Records are camelCase JSON. Each input array is decoded element by element so
//! that a malformed record is reported with its family and index.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::slot;

/// Weekday number, Monday = 1 through Sunday = 7.
pub type WeekdayNumber = u8;

/// Status flag on booking containers. Only [`BookingStatus::Confirmed`] occupies slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
    Unknown(i64),
}

impl From<i64> for BookingStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => BookingStatus::Confirmed,
            0 => BookingStatus::Pending,
            -1 => BookingStatus::Cancelled,
            other => BookingStatus::Unknown(other),
        }
    }
}

impl From<BookingStatus> for i64 {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Confirmed => 1,
            BookingStatus::Pending => 0,
            BookingStatus::Cancelled => -1,
            BookingStatus::Unknown(code) => code,
        }
    }
}

/// A daily start time: either an absolute instant (whose local clock time is
/// used) or a bare `HH:MM[:SS]` clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeOfDay {
    Clock(NaiveTime),
    Instant(DateTime<Utc>),
}

impl TimeOfDay {
    /// Slot index of this time of day, read in `tz`.
    pub fn slot(&self, tz: Tz) -> i32 {
        match self {
            TimeOfDay::Clock(time) => slot::clock_to_slot(*time),
            TimeOfDay::Instant(instant) => slot::time_to_slot(*instant, tz),
        }
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(&s) {
            return Ok(TimeOfDay::Instant(instant.with_timezone(&Utc)));
        }
        slot::parse_clock(&s)
            .map(TimeOfDay::Clock)
            .map_err(|_| format!("expected RFC 3339 timestamp or HH:MM clock, got '{}'", s))
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        match time {
            TimeOfDay::Clock(clock) => clock.format("%H:%M:%S").to_string(),
            TimeOfDay::Instant(instant) => instant.to_rfc3339(),
        }
    }
}

/// A calendar date: either a plain `YYYY-MM-DD` or an absolute instant whose
/// local date is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CalendarDay {
    Date(NaiveDate),
    Instant(DateTime<Utc>),
}

impl CalendarDay {
    pub fn local_date(&self, tz: Tz) -> NaiveDate {
        match self {
            CalendarDay::Date(date) => *date,
            CalendarDay::Instant(instant) => instant.with_timezone(&tz).date_naive(),
        }
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(&s) {
            return Ok(CalendarDay::Instant(instant.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(CalendarDay::Date)
            .map_err(|_| format!("expected YYYY-MM-DD or RFC 3339 timestamp, got '{}'", s))
    }
}

impl From<CalendarDay> for String {
    fn from(day: CalendarDay) -> Self {
        match day {
            CalendarDay::Date(date) => date.format("%Y-%m-%d").to_string(),
            CalendarDay::Instant(instant) => instant.to_rfc3339(),
        }
    }
}

/// An administrative block on one or more yards.
///
/// `start_time`/`end_time` bound the validity window by local date and also
/// supply the daily start and end clock times of the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub frequency: Vec<WeekdayNumber>,
    #[serde(default)]
    pub skip_dates: Vec<String>,
    /// Blocked yards. Older payloads spell this field `servicesId`.
    #[serde(alias = "servicesId")]
    pub service_name: Vec<String>,
}

/// A recurring reservation container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringBooking {
    pub status: BookingStatus,
    pub services: Vec<ServiceBooking>,
}

/// One yard reserved on a weekly pattern within `[start_date, end_date]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBooking {
    pub start_date: CalendarDay,
    pub end_date: CalendarDay,
    pub frequently: Vec<WeekdayNumber>,
    /// `YYYY-MM-DD` -> skip flag; only `true` entries suppress the day.
    #[serde(default)]
    pub skip_dates: BTreeMap<String, bool>,
    pub service_name: String,
    pub start_time: TimeOfDay,
    /// Minutes.
    pub duration: i64,
}

/// A reservation valid on exactly one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnetimeBooking {
    pub status: BookingStatus,
    pub time: CalendarDay,
    pub services: Vec<OnetimeService>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnetimeService {
    pub service_name: String,
    pub start_time: TimeOfDay,
    /// Minutes.
    pub duration: i64,
}

/// The three record collections for one branch, ready for the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleInput {
    pub locks: Vec<LockRecord>,
    pub recurring: Vec<RecurringBooking>,
    pub onetime: Vec<OnetimeBooking>,
}

impl ScheduleInput {
    /// Decode all three collections from their JSON array payloads.
    pub fn from_json(locks: &str, recurring: &str, onetime: &str) -> Result<Self> {
        Ok(Self {
            locks: decode_locks(locks)?,
            recurring: decode_recurring(recurring)?,
            onetime: decode_onetime(onetime)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty() && self.recurring.is_empty() && self.onetime.is_empty()
    }
}

/// Decode a JSON array of lock records.
pub fn decode_locks(json: &str) -> Result<Vec<LockRecord>> {
    decode_array(json, "lock")
}

/// Decode a JSON array of recurring bookings.
pub fn decode_recurring(json: &str) -> Result<Vec<RecurringBooking>> {
    decode_array(json, "recurring booking")
}

/// Decode a JSON array of one-time bookings.
pub fn decode_onetime(json: &str) -> Result<Vec<OnetimeBooking>> {
    decode_array(json, "one-time booking")
}

/// Post-decode checks that serde alone cannot express.
pub(crate) trait Validate {
    fn validate(&self) -> std::result::Result<(), String>;
}

impl Validate for LockRecord {
    fn validate(&self) -> std::result::Result<(), String> {
        validate_weekdays("frequency", &self.frequency)
    }
}

impl Validate for RecurringBooking {
    fn validate(&self) -> std::result::Result<(), String> {
        self.services
            .iter()
            .enumerate()
            .try_for_each(|(i, service)| {
                validate_weekdays("frequently", &service.frequently)
                    .map_err(|e| format!("service {}: {}", i, e))
            })
    }
}

impl Validate for OnetimeBooking {
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

fn validate_weekdays(field: &str, days: &[WeekdayNumber]) -> std::result::Result<(), String> {
    match days.iter().find(|d| !(1..=7).contains(*d)) {
        Some(bad) => Err(format!("{} contains weekday {} outside 1..=7", field, bad)),
        None => Ok(()),
    }
}

fn decode_array<T>(json: &str, kind: &'static str) -> Result<Vec<T>>
where
    T: DeserializeOwned + Validate,
{
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let malformed = |message: String| EngineError::MalformedRecord {
                kind,
                index,
                message,
            };
            let record: T = serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
            record.validate().map_err(malformed)?;
            Ok(record)
        })
        .collect()
}
