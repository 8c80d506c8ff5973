//! The occupancy grid: one row of [`SLOTS_PER_DAY`] slot states per yard.
//!
//! A grid is built fresh for every computation and owned by the caller. Yards
//! are kept in a `BTreeMap`, so iteration (and therefore rendering) is always
//! in sorted identifier order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::slot::SLOTS_PER_DAY;

/// Why a slot is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    /// Administrative lock.
    Locked,
    /// Recurring weekly booking.
    Scheduled,
    /// One-time booking.
    Onetime,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Locked => "locked",
            Reason::Scheduled => "scheduled",
            Reason::Onetime => "onetime",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a single half-hour slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "reason")]
pub enum SlotState {
    #[default]
    Free,
    Occupied(Reason),
}

impl SlotState {
    pub fn is_free(&self) -> bool {
        matches!(self, SlotState::Free)
    }

    pub fn reason(&self) -> Option<Reason> {
        match self {
            SlotState::Free => None,
            SlotState::Occupied(reason) => Some(*reason),
        }
    }
}

/// The slots of one yard for one day.
pub type DaySlots = [SlotState; SLOTS_PER_DAY];

/// Per-yard slot states for a single target date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OccupancyGrid {
    yards: BTreeMap<String, DaySlots>,
}

impl OccupancyGrid {
    /// Allocate an all-free row for every yard identifier. Duplicates collapse.
    pub fn initialize<I>(yard_ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let yards = yard_ids
            .into_iter()
            .map(|id| (id, [SlotState::Free; SLOTS_PER_DAY]))
            .collect();
        Self { yards }
    }

    /// Mark `count` slots starting at `start` as occupied for `reason`.
    ///
    /// The range is clamped to `[0, SLOTS_PER_DAY)`. Unknown yards, non-positive
    /// counts and ranges that fall entirely outside the day are no-ops. A later
    /// fill overwrites the reason of an earlier one.
    ///
    /// Returns the number of slots written.
    pub fn fill(&mut self, yard_id: &str, start: i32, count: i64, reason: Reason) -> usize {
        let Some(slots) = self.yards.get_mut(yard_id) else {
            return 0;
        };
        if count <= 0 {
            return 0;
        }

        let day = SLOTS_PER_DAY as i64;
        let lo = i64::from(start).clamp(0, day);
        let hi = i64::from(start).saturating_add(count).clamp(0, day);
        if lo >= hi {
            return 0;
        }

        for slot in &mut slots[lo as usize..hi as usize] {
            *slot = SlotState::Occupied(reason);
        }
        (hi - lo) as usize
    }

    /// The slot row for `yard_id`, or `None` if the yard is not tracked.
    pub fn slots(&self, yard_id: &str) -> Option<&DaySlots> {
        self.yards.get(yard_id)
    }

    pub fn contains_yard(&self, yard_id: &str) -> bool {
        self.yards.contains_key(yard_id)
    }

    /// Yard identifiers in sorted order.
    pub fn yard_ids(&self) -> impl Iterator<Item = &str> {
        self.yards.keys().map(String::as_str)
    }

    /// `(yard, slots)` pairs in sorted yard order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DaySlots)> {
        self.yards.iter().map(|(id, slots)| (id.as_str(), slots))
    }

    pub fn len(&self) -> usize {
        self.yards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.yards.is_empty()
    }

    /// Total number of occupied slots across all yards.
    pub fn occupied_count(&self) -> usize {
        self.yards
            .values()
            .flat_map(|slots| slots.iter())
            .filter(|slot| !slot.is_free())
            .count()
    }
}

impl Serialize for OccupancyGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.yards.iter().map(|(id, slots)| (id, &slots[..])))
    }
}
