//! Tests for record decoding and validation.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::json;
use yard_engine::error::EngineError;
use yard_engine::records::{
    decode_locks, decode_onetime, decode_recurring, BookingStatus, CalendarDay, ScheduleInput,
    TimeOfDay,
};

// ── Locks ───────────────────────────────────────────────────────────────────

#[test]
fn lock_decodes_with_defaults() {
    let json = json!([{
        "startTime": "2024-01-01T18:00:00Z",
        "endTime": "2024-12-31T20:00:00Z",
        "frequency": [1, 3, 5],
        "serviceName": ["san_1", "san_2"]
    }])
    .to_string();

    let locks = decode_locks(&json).unwrap();
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].frequency, vec![1, 3, 5]);
    assert_eq!(locks[0].service_name, vec!["san_1", "san_2"]);
    assert!(locks[0].skip_dates.is_empty());
    assert_eq!(
        locks[0].start_time,
        Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap()
    );
}

#[test]
fn lock_offsets_are_normalized_to_utc() {
    let json = json!([{
        "startTime": "2024-01-01T18:00:00+07:00",
        "endTime": "2024-01-01T20:00:00+07:00",
        "frequency": [1],
        "serviceName": ["san_1"]
    }])
    .to_string();

    let locks = decode_locks(&json).unwrap();
    assert_eq!(
        locks[0].start_time,
        Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap()
    );
}

#[test]
fn lock_accepts_legacy_services_id_field() {
    let json = json!([{
        "startTime": "2024-01-01T18:00:00Z",
        "endTime": "2024-12-31T20:00:00Z",
        "frequency": [1],
        "servicesId": ["san_9"]
    }])
    .to_string();

    let locks = decode_locks(&json).unwrap();
    assert_eq!(locks[0].service_name, vec!["san_9"]);
}

#[test]
fn lock_missing_yard_list_reports_index() {
    let json = json!([
        {
            "startTime": "2024-01-01T18:00:00Z",
            "endTime": "2024-12-31T20:00:00Z",
            "frequency": [1],
            "serviceName": ["san_1"]
        },
        {
            "startTime": "2024-01-01T18:00:00Z",
            "endTime": "2024-12-31T20:00:00Z",
            "frequency": [1]
        }
    ])
    .to_string();

    match decode_locks(&json) {
        Err(EngineError::MalformedRecord {
            kind,
            index,
            message,
        }) => {
            assert_eq!(kind, "lock");
            assert_eq!(index, 1);
            assert!(message.contains("serviceName"), "message: {}", message);
        }
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
}

#[test]
fn lock_weekday_out_of_range_is_malformed() {
    let json = json!([{
        "startTime": "2024-01-01T18:00:00Z",
        "endTime": "2024-12-31T20:00:00Z",
        "frequency": [0, 1],
        "serviceName": ["san_1"]
    }])
    .to_string();

    let err = decode_locks(&json).unwrap_err();
    assert!(matches!(err, EngineError::MalformedRecord { index: 0, .. }));
    assert!(err.to_string().contains("weekday 0"));
}

#[test]
fn non_array_input_is_json_error() {
    assert!(matches!(decode_locks("{}"), Err(EngineError::Json(_))));
    assert!(matches!(decode_onetime("not json"), Err(EngineError::Json(_))));
}

#[test]
fn empty_arrays_decode_to_empty_input() {
    let input = ScheduleInput::from_json("[]", "[]", "[]").unwrap();
    assert!(input.is_empty());
}

// ── Recurring bookings ──────────────────────────────────────────────────────

#[test]
fn recurring_booking_decodes_dates_clocks_and_skip_map() {
    let json = json!([{
        "status": 1,
        "services": [{
            "startDate": "2024-01-01",
            "endDate": "2024-12-31T16:59:59Z",
            "frequently": [1, 2, 3, 4, 5, 6, 7],
            "skipDates": { "2024-06-12": true, "2024-06-13": false },
            "serviceName": "san_1",
            "startTime": "08:00",
            "duration": 90
        }]
    }])
    .to_string();

    let bookings = decode_recurring(&json).unwrap();
    let booking = &bookings[0];
    assert_eq!(booking.status, BookingStatus::Confirmed);

    let service = &booking.services[0];
    assert_eq!(
        service.start_date,
        CalendarDay::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    );
    assert!(matches!(service.end_date, CalendarDay::Instant(_)));
    assert_eq!(
        service.start_time,
        TimeOfDay::Clock(NaiveTime::from_hms_opt(8, 0, 0).unwrap())
    );
    assert_eq!(service.skip_dates.get("2024-06-12"), Some(&true));
    assert_eq!(service.duration, 90);
}

#[test]
fn unknown_status_codes_are_preserved() {
    let json = json!([
        { "status": 0, "services": [] },
        { "status": -1, "services": [] },
        { "status": 5, "services": [] }
    ])
    .to_string();

    let statuses: Vec<_> = decode_recurring(&json)
        .unwrap()
        .into_iter()
        .map(|b| b.status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            BookingStatus::Pending,
            BookingStatus::Cancelled,
            BookingStatus::Unknown(5)
        ]
    );
}

#[test]
fn recurring_bad_start_time_is_malformed() {
    let json = json!([{
        "status": 1,
        "services": [{
            "startDate": "2024-01-01",
            "endDate": "2024-12-31",
            "frequently": [1],
            "serviceName": "san_1",
            "startTime": "eight o'clock",
            "duration": 60
        }]
    }])
    .to_string();

    let err = decode_recurring(&json).unwrap_err();
    assert!(matches!(
        err,
        EngineError::MalformedRecord {
            kind: "recurring booking",
            index: 0,
            ..
        }
    ));
}

#[test]
fn recurring_service_weekday_validation_names_service() {
    let json = json!([{
        "status": 1,
        "services": [
            {
                "startDate": "2024-01-01",
                "endDate": "2024-12-31",
                "frequently": [1],
                "serviceName": "san_1",
                "startTime": "08:00",
                "duration": 60
            },
            {
                "startDate": "2024-01-01",
                "endDate": "2024-12-31",
                "frequently": [8],
                "serviceName": "san_2",
                "startTime": "08:00",
                "duration": 60
            }
        ]
    }])
    .to_string();

    let err = decode_recurring(&json).unwrap_err();
    assert!(err.to_string().contains("service 1"), "{}", err);
}

// ── One-time bookings ───────────────────────────────────────────────────────

#[test]
fn onetime_booking_decodes() {
    let json = json!([{
        "status": 1,
        "time": "2024-06-10T00:00:00Z",
        "services": [
            { "serviceName": "san_2", "startTime": "2024-06-10T14:00:00Z", "duration": 30 }
        ],
        "extraField": "ignored"
    }])
    .to_string();

    let bookings = decode_onetime(&json).unwrap();
    assert_eq!(bookings[0].services[0].service_name, "san_2");
    assert!(matches!(
        bookings[0].services[0].start_time,
        TimeOfDay::Instant(_)
    ));
}

#[test]
fn onetime_missing_duration_is_malformed() {
    let json = json!([{
        "status": 1,
        "time": "2024-06-10",
        "services": [{ "serviceName": "san_2", "startTime": "14:00" }]
    }])
    .to_string();

    let err = decode_onetime(&json).unwrap_err();
    assert!(err.to_string().contains("duration"), "{}", err);
}

#[test]
fn string_backed_fields_serialize_back_to_strings() {
    let clock = serde_json::to_value(TimeOfDay::Clock(NaiveTime::from_hms_opt(8, 0, 0).unwrap()))
        .unwrap();
    assert_eq!(clock, json!("08:00:00"));

    let day = serde_json::to_value(CalendarDay::Date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()))
        .unwrap();
    assert_eq!(day, json!("2024-06-10"));

    assert_eq!(serde_json::to_value(BookingStatus::Confirmed).unwrap(), json!(1));
}
