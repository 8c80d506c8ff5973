//! Text rendering of an occupancy grid.
//!
//! The table shows a contiguous [`DisplayWindow`] of slots (by default the
//! evening, 18:00-23:00) with one glyph per slot. Reasons are collapsed to a
//! single "occupied" glyph; [`display_summary`] keeps them.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::engine::AvailableSlot;
use crate::error::{EngineError, Result};
use crate::grid::{OccupancyGrid, Reason};
use crate::slot::{slot_to_time, time_labels, SLOTS_PER_DAY};

pub const OCCUPIED_GLYPH: &str = "✅";
pub const FREE_GLYPH: &str = "⬜";

const RULE_WIDTH: usize = 50;
const LABEL_WIDTH: usize = 12;
const COLUMN_WIDTH: usize = 7;

/// Half-open range of slot indices to display, within `[0, SLOTS_PER_DAY]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindow {
    start: usize,
    end: usize,
}

impl DisplayWindow {
    /// Evening window used by default: 18:00 up to 23:00.
    pub const EVENING: DisplayWindow = DisplayWindow { start: 36, end: 46 };

    /// The whole day.
    pub const FULL_DAY: DisplayWindow = DisplayWindow {
        start: 0,
        end: SLOTS_PER_DAY,
    };

    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start >= end || end > SLOTS_PER_DAY {
            return Err(EngineError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for DisplayWindow {
    fn default() -> Self {
        Self::EVENING
    }
}

impl fmt::Display for DisplayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Parses `START..END` slot indices, e.g. `36..46`.
impl FromStr for DisplayWindow {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EngineError::WindowSyntax(s.to_string());
        let (start, end) = s.split_once("..").ok_or_else(invalid)?;
        let start = start.trim().parse().map_err(|_| invalid())?;
        let end = end.trim().parse().map_err(|_| invalid())?;
        Self::new(start, end)
    }
}

/// Heading information printed above the yard rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelInfo {
    pub branch_name: String,
    pub address: String,
    /// Print the row of time labels. Batch output shows it only once.
    pub show_time_header: bool,
}

/// Render `grid` over `window` as a fixed-width table.
pub fn render(grid: &OccupancyGrid, window: DisplayWindow, label: &LabelInfo) -> String {
    let labels = time_labels(window.range());

    let mut table = "=".repeat(RULE_WIDTH);
    table.push_str("\n\n");

    if label.show_time_header {
        push_time_header(&mut table, &labels);
    }

    table.push_str(&format!("{} {}\n", label.branch_name, label.address));
    table.push_str(&"-".repeat(LABEL_WIDTH));
    table.push('\n');

    for (yard, slots) in grid.iter() {
        table.push_str(&format!("{:<width$}", yard, width = LABEL_WIDTH));
        for state in &slots[window.range()] {
            let glyph = if state.is_free() { FREE_GLYPH } else { OCCUPIED_GLYPH };
            table.push_str(glyph);
            table.push_str(&" ".repeat(COLUMN_WIDTH - 1));
        }
        table.push('\n');
    }

    table
}

fn push_time_header(table: &mut String, labels: &[String]) {
    table.push_str(&format!("{:<width$}", "Yard", width = LABEL_WIDTH));

    // Emoji glyphs render two cells wide, so every third label drops its
    // leading space to stay aligned with the rows below.
    for (i, time) in labels.iter().enumerate() {
        if (i + 1) % 3 > 0 {
            table.push_str(&format!(" {:<width$}", time, width = COLUMN_WIDTH));
        } else {
            table.push_str(&format!("{:<width$}", time, width = COLUMN_WIDTH - 1));
        }
    }
    table.push('\n');
    table.push_str(&"-".repeat(LABEL_WIDTH + labels.len() * COLUMN_WIDTH));
    table.push('\n');
}

/// yard -> {time label -> reason} for occupied slots only. Yards with no
/// occupied slot map to an empty table.
pub fn display_summary(grid: &OccupancyGrid) -> BTreeMap<String, BTreeMap<String, Reason>> {
    grid.iter()
        .map(|(yard, slots)| {
            let occupied = slots
                .iter()
                .enumerate()
                .filter_map(|(i, state)| state.reason().map(|r| (slot_to_time(i), r)))
                .collect();
            (yard.to_string(), occupied)
        })
        .collect()
}

/// Describe free slots as comma-separated ranges.
///
/// Runs of consecutive slots print as `start - end`, where `end` is the start
/// of the slot after the run; isolated slots print as a single time.
pub fn format_available_slots(slots: &[AvailableSlot]) -> String {
    if slots.is_empty() {
        return "No available slots".to_string();
    }

    let mut groups: Vec<&[AvailableSlot]> = Vec::new();
    let mut run_start = 0;
    for i in 1..=slots.len() {
        if i == slots.len() || slots[i].index != slots[i - 1].index + 1 {
            groups.push(&slots[run_start..i]);
            run_start = i;
        }
    }

    groups
        .iter()
        .map(|group| match *group {
            [single] => single.time.clone(),
            [first, .., last] => format!("{} - {}", first.time, slot_to_time(last.index + 1)),
            [] => String::new(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
