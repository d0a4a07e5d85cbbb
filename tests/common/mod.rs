#![allow(dead_code)]

use quake_dashboard::{Dataset, EventRecord};

pub fn event(
    event_type: &str,
    mag: f64,
    depth: f64,
    status: &str,
    lat: f64,
    lon: f64,
    location: &str,
) -> EventRecord {
    EventRecord::new(event_type, mag, depth, status).at(lat, lon, location)
}

/// Four events across three countries, two event types and two statuses.
pub fn sample_dataset() -> Dataset {
    let records = vec![
        event("earthquake", 1.2, 8.0, "reviewed", 38.8, -122.8, "California, United States"),
        event("earthquake", 2.4, 12.5, "reviewed", 61.3, -150.0, "Alaska, United States"),
        event("quarry blast", 1.6, 0.2, "automatic", 19.2, -155.4, "Hawaii, United States"),
        event("earthquake", 4.8, 35.0, "reviewed", -3.1, 140.2, "Papua New Guinea"),
    ];
    Dataset::from_records(&records).expect("sample dataset")
}
