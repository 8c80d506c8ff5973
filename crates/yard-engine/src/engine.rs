//! Booking engine -- builds the occupancy grid for one target day and answers
//! availability queries over it.
//!
//! The grid is a plain value: [`compute_schedule`] returns a fresh one on every
//! call and the query functions only borrow it.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::grid::{OccupancyGrid, Reason};
use crate::records::ScheduleInput;
use crate::slot::{slot_to_time, SLOTS_PER_DAY};
use crate::source::{self, OccupancySource, TargetDay, PROCESSING_ORDER};

/// A free slot, with its start time label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableSlot {
    pub index: usize,
    pub time: String,
}

/// Result of checking one yard against a slot range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YardAvailability {
    /// Whether `yard` is free for the whole requested range.
    pub is_available: bool,
    /// Every yard free for the whole requested range.
    pub available_yards: Vec<String>,
    /// All free slots of `yard` over the day.
    pub free_slots: Vec<AvailableSlot>,
}

/// Union of every yard referenced by any input record, sorted and deduplicated.
pub fn collect_yards(input: &ScheduleInput) -> BTreeSet<String> {
    let mut yards = BTreeSet::new();
    extend_yards(&mut yards, &input.locks);
    extend_yards(&mut yards, &input.recurring);
    extend_yards(&mut yards, &input.onetime);
    yards
}

fn extend_yards<S: OccupancySource>(yards: &mut BTreeSet<String>, records: &[S]) {
    for record in records {
        for id in record.yard_ids() {
            if !yards.contains(id) {
                yards.insert(id.to_string());
            }
        }
    }
}

/// Compute the occupancy grid for `day`.
///
/// Discovers the yard set from the records, initializes an all-free grid over
/// it, then applies locks, recurring bookings and one-time bookings in
/// [`PROCESSING_ORDER`].
pub fn compute_schedule(input: &ScheduleInput, day: &TargetDay) -> OccupancyGrid {
    let mut grid = OccupancyGrid::initialize(collect_yards(input));

    for reason in PROCESSING_ORDER {
        match reason {
            Reason::Locked => source::apply(&mut grid, &input.locks, day),
            Reason::Scheduled => source::apply(&mut grid, &input.recurring, day),
            Reason::Onetime => source::apply(&mut grid, &input.onetime, day),
        };
    }

    tracing::debug!(
        date = %day.key(),
        yards = grid.len(),
        occupied = grid.occupied_count(),
        "computed schedule",
    );
    grid
}

/// Free slots of `yard_id` over the whole day. Empty if the yard is unknown.
pub fn available_slots(grid: &OccupancyGrid, yard_id: &str) -> Vec<AvailableSlot> {
    let Some(slots) = grid.slots(yard_id) else {
        return Vec::new();
    };

    slots
        .iter()
        .enumerate()
        .filter(|(_, state)| state.is_free())
        .map(|(index, _)| AvailableSlot {
            index,
            time: slot_to_time(index),
        })
        .collect()
}

/// Yards whose slots in `[start, end)` are all free, in sorted order.
///
/// `end` is clamped to the end of the day; an empty range makes every yard
/// available.
pub fn available_yards(grid: &OccupancyGrid, start: usize, end: usize) -> Vec<String> {
    let end = end.min(SLOTS_PER_DAY);

    grid.iter()
        .filter(|(_, slots)| start >= end || slots[start..end].iter().all(|s| s.is_free()))
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Check whether `yard_id` is free over `[start, end)`, alongside the other
/// yards that are and the yard's own free slots.
pub fn check_yard_availability(
    grid: &OccupancyGrid,
    yard_id: &str,
    start: usize,
    end: usize,
) -> YardAvailability {
    let available_yards = available_yards(grid, start, end);
    YardAvailability {
        is_available: available_yards.iter().any(|y| y == yard_id),
        available_yards,
        free_slots: available_slots(grid, yard_id),
    }
}
