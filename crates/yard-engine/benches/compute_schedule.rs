//! Benchmarks for `compute_schedule` over branches of increasing size.

use std::collections::BTreeMap;
use std::hint::black_box;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use yard_engine::records::{
    BookingStatus, CalendarDay, LockRecord, OnetimeBooking, OnetimeService, RecurringBooking,
    ScheduleInput, ServiceBooking, TimeOfDay,
};
use yard_engine::{compute_schedule, TargetDay};

fn clock(slot: usize) -> NaiveTime {
    NaiveTime::from_hms_opt((slot / 2) as u32, ((slot % 2) * 30) as u32, 0).unwrap()
}

/// A branch with `yards` yards, one lock each, and a booking in every other
/// evening slot of every yard.
fn branch(yards: usize) -> ScheduleInput {
    let year_start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let year_end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let names: Vec<String> = (0..yards).map(|i| format!("san_{}", i)).collect();

    let locks = names
        .iter()
        .map(|yard| LockRecord {
            start_time: Utc.from_utc_datetime(&year_start.and_time(clock(12))),
            end_time: Utc.from_utc_datetime(&year_end.and_time(clock(14))),
            frequency: vec![1, 3, 5],
            skip_dates: Vec::new(),
            service_name: vec![yard.clone()],
        })
        .collect();

    let recurring = names
        .iter()
        .map(|yard| RecurringBooking {
            status: BookingStatus::Confirmed,
            services: (32..46)
                .step_by(2)
                .map(|slot| ServiceBooking {
                    start_date: CalendarDay::Date(year_start),
                    end_date: CalendarDay::Date(year_end),
                    frequently: vec![1, 2, 3, 4, 5, 6, 7],
                    skip_dates: BTreeMap::new(),
                    service_name: yard.clone(),
                    start_time: TimeOfDay::Clock(clock(slot)),
                    duration: 60,
                })
                .collect(),
        })
        .collect();

    let onetime = names
        .iter()
        .map(|yard| OnetimeBooking {
            status: BookingStatus::Confirmed,
            time: CalendarDay::Date(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()),
            services: vec![OnetimeService {
                service_name: yard.clone(),
                start_time: TimeOfDay::Clock(clock(20)),
                duration: 90,
            }],
        })
        .collect();

    ScheduleInput {
        locks,
        recurring,
        onetime,
    }
}

fn bench_compute_schedule(c: &mut Criterion) {
    let day = TargetDay::new(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(), Tz::UTC);
    let mut group = c.benchmark_group("compute_schedule");

    for yards in [4usize, 16, 64] {
        let input = branch(yards);
        group.throughput(Throughput::Elements(yards as u64));
        group.bench_with_input(BenchmarkId::from_parameter(yards), &input, |b, input| {
            b.iter(|| compute_schedule(black_box(input), black_box(&day)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_schedule);
criterion_main!(benches);
