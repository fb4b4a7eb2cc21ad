//! Shared fixtures for the library integration tests.

use std::fs;
use std::path::PathBuf;

use campusnav_lib::{Bounds, Point, RouteData, TravelMode};
use chrono::{NaiveDate, NaiveDateTime};

/// Path to the fixtures directory shared with the CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[allow(dead_code)]
pub fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
}

/// Geographic bounds of the Hall Building floor plans.
#[allow(dead_code)]
pub fn hall_bounds() -> Bounds {
    Bounds::new(Point::new(45.49769, -73.5783), Point::new(45.49682, -73.57954))
}

/// Minimal decoded route with a predictable id.
#[allow(dead_code)]
pub fn sample_route(id: &str) -> RouteData {
    let mut route = RouteData::from_overview(id, "_p~iF~ps|U_ulLnnqC_mqNvxq`@", TravelMode::Walking)
        .expect("fixture polyline decodes");
    route.distance = "1.2 km".to_string();
    route.duration = "15 min".to_string();
    route.eta = "10:15 ETA".to_string();
    route
}

#[allow(dead_code)]
pub fn sample_routes(count: usize) -> Vec<RouteData> {
    (0..count)
        .map(|index| sample_route(&format!("route-{index}")))
        .collect()
}

/// `year-month-day hour:minute:00`.
#[allow(dead_code)]
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid fixture timestamp")
}
