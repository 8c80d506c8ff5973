//! `yards` CLI: render half-hour yard occupancy from booking records.
//!
//! Record files are the decrypted JSON arrays returned by the booking
//! service: lock records, recurring ("schedule") bookings and one-time
//! bookings. Any file left out counts as an empty list.
//!
//! ## Usage
//!
//! ```sh
//! # Evening table (18:00-23:00) for one branch on a given day
//! yards render --locks locks.json --schedules schedules.json --onetime onetime.json \
//!     --date 2024-06-12 --timezone Asia/Ho_Chi_Minh --name "Branch 1" --address "1 Main St"
//!
//! # Whole day instead of the evening
//! yards render --schedules schedules.json --window 0..48
//!
//! # Occupied slots with their reasons, as JSON
//! yards summary --locks locks.json --schedules schedules.json
//!
//! # Free slots of one yard
//! yards slots --schedules schedules.json --yard san_1
//!
//! # Is a yard free from 18:00 to 20:00?
//! yards check --schedules schedules.json --yard san_1 --from 18:00 --to 20:00
//!
//! # Every configured branch, reading <data-dir>/<branch id>/{locks,schedules,onetime}.json
//! yards batch --branches branches.json --data-dir data/ -o output.txt
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

mod branches;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use yard_engine::render::format_available_slots;
use yard_engine::slot::slot_range;
use yard_engine::{
    available_slots, check_yard_availability, compute_schedule, display_summary, parse_timezone,
    render, DisplayWindow, LabelInfo, ScheduleInput, TargetDay,
};

use crate::branches::{load_branches, Branch, BranchFilter};

#[derive(Parser)]
#[command(
    name = "yards",
    version,
    about = "Half-hour yard occupancy from locks, recurring and one-time bookings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Lock records (JSON array)
    #[arg(long)]
    locks: Option<PathBuf>,
    /// Recurring bookings (JSON array)
    #[arg(long)]
    schedules: Option<PathBuf>,
    /// One-time bookings (JSON array)
    #[arg(long)]
    onetime: Option<PathBuf>,
}

#[derive(Args)]
struct DayArgs {
    /// Target date, YYYY-MM-DD (defaults to today in --timezone)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// IANA timezone used to read clock times and dates
    #[arg(long, default_value = "UTC")]
    timezone: String,
}

impl DayArgs {
    fn target_day(&self) -> Result<TargetDay> {
        let tz = parse_timezone(&self.timezone)?;
        Ok(match self.date {
            Some(date) => TargetDay::new(date, tz),
            None => TargetDay::today(tz),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the occupancy table for one branch
    Render {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        day: DayArgs,
        /// Slot indices to display, START..END
        #[arg(long, default_value_t = DisplayWindow::EVENING)]
        window: DisplayWindow,
        /// Branch name for the heading
        #[arg(long, default_value = "")]
        name: String,
        /// Branch address for the heading
        #[arg(long, default_value = "")]
        address: String,
        /// Omit the row of time labels
        #[arg(long)]
        no_time_header: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print occupied slots and their reasons as JSON
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        day: DayArgs,
    },
    /// List the free slots of one yard
    Slots {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        day: DayArgs,
        #[arg(long)]
        yard: String,
        /// Print the slot list as JSON instead of grouped ranges
        #[arg(long)]
        json: bool,
    },
    /// Check whether a yard is free between two clock times
    Check {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        day: DayArgs,
        #[arg(long)]
        yard: String,
        /// Start clock time, HH:MM
        #[arg(long)]
        from: String,
        /// End clock time, HH:MM (exclusive); 24:00 for end of day
        #[arg(long)]
        to: String,
    },
    /// Render every branch in a branch list
    Batch {
        /// Branch list (JSON array of {id, name, address, type, provinceId, status})
        #[arg(long)]
        branches: PathBuf,
        /// Directory holding <branch id>/{locks,schedules,onetime}.json
        #[arg(long)]
        data_dir: PathBuf,
        #[command(flatten)]
        day: DayArgs,
        #[arg(long, default_value_t = DisplayWindow::EVENING)]
        window: DisplayWindow,
        /// Only branches of this type
        #[arg(long = "type")]
        kind: Option<i64>,
        /// Only branches in this province
        #[arg(long)]
        province: Option<i64>,
        /// Only branches with this status
        #[arg(long)]
        status: Option<i64>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            source,
            day,
            window,
            name,
            address,
            no_time_header,
            output,
        } => {
            let input = load_sources(&source)?;
            let grid = compute_schedule(&input, &day.target_day()?);
            let label = LabelInfo {
                branch_name: name,
                address,
                show_time_header: !no_time_header,
            };
            write_output(output.as_deref(), &render(&grid, window, &label))?;
        }
        Commands::Summary { source, day } => {
            let input = load_sources(&source)?;
            let grid = compute_schedule(&input, &day.target_day()?);
            let summary = serde_json::to_string_pretty(&display_summary(&grid))?;
            println!("{}", summary);
        }
        Commands::Slots {
            source,
            day,
            yard,
            json,
        } => {
            let input = load_sources(&source)?;
            let grid = compute_schedule(&input, &day.target_day()?);
            if !grid.contains_yard(&yard) {
                tracing::warn!(yard = %yard, "yard is not referenced by any record");
            }
            let slots = available_slots(&grid, &yard);
            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                println!("{}", format_available_slots(&slots));
            }
        }
        Commands::Check {
            source,
            day,
            yard,
            from,
            to,
        } => {
            let range = slot_range(&from, &to)?;
            let input = load_sources(&source)?;
            let grid = compute_schedule(&input, &day.target_day()?);
            let result = check_yard_availability(&grid, &yard, range.start, range.end);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Batch {
            branches,
            data_dir,
            day,
            window,
            kind,
            province,
            status,
            output,
        } => {
            let filter = BranchFilter {
                kind,
                province_id: province,
                status,
            };
            let branches = load_branches(&branches, &filter)?;
            let target = day.target_day()?;
            tracing::info!(count = branches.len(), date = %target.key(), "processing branches");

            let mut out = String::new();
            for (i, branch) in branches.iter().enumerate() {
                match render_branch(branch, &data_dir, &target, window, i == 0) {
                    Ok(table) => {
                        tracing::info!(branch = %branch.name, "completed branch");
                        out.push_str(&table);
                    }
                    Err(e) => {
                        tracing::error!(branch = %branch.name, error = %format!("{:#}", e), "branch failed");
                        out.push_str(&format!("Error processing {}: {:#}\n", branch.name, e));
                    }
                }
            }
            write_output(output.as_deref(), &out)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("yards=info,yard_engine=warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Render one branch from `<data_dir>/<id>/`. Missing files count as empty lists.
fn render_branch(
    branch: &Branch,
    data_dir: &Path,
    day: &TargetDay,
    window: DisplayWindow,
    show_time_header: bool,
) -> Result<String> {
    let dir = data_dir.join(branch.id.to_string());
    let source = SourceArgs {
        locks: existing(dir.join("locks.json")),
        schedules: existing(dir.join("schedules.json")),
        onetime: existing(dir.join("onetime.json")),
    };
    let input = load_sources(&source)?;
    let grid = compute_schedule(&input, day);
    let label = LabelInfo {
        branch_name: branch.name.clone(),
        address: branch.address.clone(),
        show_time_header,
    };
    Ok(render(&grid, window, &label))
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

fn load_sources(source: &SourceArgs) -> Result<ScheduleInput> {
    let locks = read_records(source.locks.as_deref())?;
    let recurring = read_records(source.schedules.as_deref())?;
    let onetime = read_records(source.onetime.as_deref())?;
    let input = ScheduleInput::from_json(&locks, &recurring, &onetime)
        .context("Failed to decode booking records")?;
    tracing::debug!(
        locks = input.locks.len(),
        recurring = input.recurring.len(),
        onetime = input.onetime.len(),
        "loaded records",
    );
    Ok(input)
}

/// Read a record file; `-` reads stdin and a missing path is an empty list.
fn read_records(path: Option<&Path>) -> Result<String> {
    match path {
        None => Ok("[]".to_string()),
        Some(path) if path == Path::new("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
