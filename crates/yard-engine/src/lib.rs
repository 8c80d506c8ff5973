//! # yard-engine
//!
//! Half-hour slot occupancy for bookable yards.
//!
//! For one branch and one target date, merges three independent sources of
//! occupancy (administrative locks, recurring weekly bookings and one-time
//! bookings) into a per-yard grid of 48 half-hour slots, each either free or
//! occupied with the reason that filled it.
//!
//! ## Modules
//!
//! - [`slot`]: Clock time / duration ↔ slot index conversions
//! - [`grid`]: The occupancy grid and its fill operation
//! - [`records`]: Lock and booking record shapes, JSON decoding
//! - [`source`]: Per-family gate/window/fill logic and processing order
//! - [`engine`]: `compute_schedule` and availability queries
//! - [`render`]: Fixed-width table and summaries
//! - [`error`]: Error types

pub mod engine;
pub mod error;
pub mod grid;
pub mod records;
pub mod render;
pub mod slot;
pub mod source;

pub use engine::{available_slots, available_yards, check_yard_availability, compute_schedule};
pub use error::EngineError;
pub use grid::{OccupancyGrid, Reason, SlotState};
pub use records::ScheduleInput;
pub use render::{display_summary, render, DisplayWindow, LabelInfo};
pub use source::{parse_timezone, TargetDay, PROCESSING_ORDER};
