//! Concordia inter-campus shuttle planning.
//!
//! A trip qualifies for the shuttle when it starts within walking distance
//! of one campus stop and ends within walking distance of the other. The
//! planner picks a departure from the timetable, then stitches the walk to
//! the stop, the ride along a fixed street path and the walk from the far
//! stop into a single [`RouteData`].

use std::env;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::directions::{
    format_clock, format_distance, format_duration_minutes, parse_distance_label,
    parse_duration_label,
};
use crate::error::{Error, Result};
use crate::geometry::{great_circle_distance_meters, Point};
use crate::polyline::{decode_polyline, encode_polyline};
use crate::route::{DirectionStep, RouteData, TimeMode, TransitDetails, TravelMode};

/// Environment variable overriding the shuttle timetable path.
pub const SHUTTLE_SCHEDULE_ENV: &str = "CAMPUSNAV_SHUTTLE_SCHEDULE";

pub const SGW_STOP: Point = Point::new(45.457795, -73.6389265);
pub const LOY_STOP: Point = Point::new(45.4970723, -73.578448);

/// Furthest a rider is expected to walk to or from a stop.
pub const MAX_WALKING_DISTANCE_M: f64 = 800.0;
pub const SHUTTLE_RIDE_MINUTES: i64 = 30;
pub const SHUTTLE_RIDE_DISTANCE_M: f64 = 7200.0;

/// Walking pace used when no walking leg is supplied.
const FALLBACK_WALK_METERS_PER_MINUTE: f64 = 80.0;

const SHUTTLE_LINE_NAME: &str = "Concordia Student Shuttle";
const SHUTTLE_LINE_SHORT_NAME: &str = "C";
const SHUTTLE_VEHICLE: &str = "Shuttle";

/// Street path driven by the shuttle, from the SGW stop to the Loyola stop.
pub const SHUTTLE_STREET_PATH: [Point; 42] = [
    SGW_STOP,
    Point::new(45.4592248, -73.6372367),
    Point::new(45.4597102, -73.6366037),
    Point::new(45.4606095, -73.6348656),
    Point::new(45.4616931, -73.6328217),
    Point::new(45.4636947, -73.6290506),
    Point::new(45.4638866, -73.6287716),
    Point::new(45.4650416, -73.6266527),
    Point::new(45.4659183, -73.6249092),
    Point::new(45.4667911, -73.6232784),
    Point::new(45.467773, -73.6214063),
    Point::new(45.4704441, -73.6162135),
    Point::new(45.4713243, -73.6145076),
    Point::new(45.4726786, -73.6118844),
    Point::new(45.4740103, -73.6092398),
    Point::new(45.4744504, -73.6087409),
    Point::new(45.4759926, -73.6069706),
    Point::new(45.4774295, -73.6053023),
    Point::new(45.4791485, -73.6033175),
    Point::new(45.4810555, -73.6011502),
    Point::new(45.4823456, -73.5996267),
    Point::new(45.4841998, -73.5975024),
    Point::new(45.4856102, -73.5958931),
    Point::new(45.4861969, -73.5952225),
    Point::new(45.4868287, -73.5944823),
    Point::new(45.4870694, -73.5940263),
    Point::new(45.4877802, -73.5921326),
    Point::new(45.4879983, -73.5918376),
    Point::new(45.4892017, -73.5903141),
    Point::new(45.4907586, -73.5886136),
    Point::new(45.4915484, -73.5877124),
    Point::new(45.4928758, -73.5856202),
    Point::new(45.4935677, -73.584483),
    Point::new(45.4938009, -73.5842148),
    Point::new(45.4947748, -73.5833833),
    Point::new(45.4958653, -73.582423),
    Point::new(45.4966249, -73.5817793),
    Point::new(45.4960646, -73.5800466),
    Point::new(45.4957487, -73.5792902),
    Point::new(45.4961511, -73.5792366),
    Point::new(45.4963504, -73.5790864),
    LOY_STOP,
];

/// Campus served by the shuttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Campus {
    #[serde(rename = "SGW")]
    Sgw,
    #[serde(rename = "LOY")]
    Loy,
}

impl Campus {
    pub fn stop(self) -> Point {
        match self {
            Campus::Sgw => SGW_STOP,
            Campus::Loy => LOY_STOP,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Campus::Sgw => "SGW Hall Building",
            Campus::Loy => "Loyola Campus",
        }
    }

    pub fn other(self) -> Campus {
        match self {
            Campus::Sgw => Campus::Loy,
            Campus::Loy => Campus::Sgw,
        }
    }
}

impl fmt::Display for Campus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Campus::Sgw => "SGW",
            Campus::Loy => "LOY",
        })
    }
}

/// Departure times (`HH:MM`) from each campus for one service day type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTimetable {
    #[serde(rename = "SGW")]
    pub sgw: Vec<String>,
    #[serde(rename = "LOY")]
    pub loy: Vec<String>,
}

impl DayTimetable {
    pub fn departures(&self, campus: Campus) -> &[String] {
        match campus {
            Campus::Sgw => &self.sgw,
            Campus::Loy => &self.loy,
        }
    }
}

/// Weekly shuttle timetable. Weekends have no service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuttleSchedule {
    pub monday_thursday: DayTimetable,
    pub friday: DayTimetable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

fn times(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|entry| entry.to_string()).collect()
}

static FALLBACK_SCHEDULE: Lazy<ShuttleSchedule> = Lazy::new(|| ShuttleSchedule {
    monday_thursday: DayTimetable {
        loy: times(&[
            "09:15", "09:30", "09:45", "10:00", "10:15", "10:30", "10:45", "11:00", "11:15",
            "11:30", "11:45", "12:30", "12:45", "13:00", "13:15", "13:30", "13:45", "14:00",
            "14:15", "14:30", "14:45", "15:00", "15:15", "15:30", "15:45", "16:30", "16:45",
            "17:00", "17:15", "17:30", "17:45", "18:00", "18:15", "18:30",
        ]),
        sgw: times(&[
            "09:30", "09:45", "10:00", "10:15", "10:30", "10:45", "11:00", "11:15", "11:30",
            "12:15", "12:30", "13:00", "13:15", "13:30", "13:45", "14:00", "14:15", "14:30",
            "14:45", "15:00", "15:15", "15:30", "16:00", "16:15", "16:45", "17:00", "17:15",
            "17:30", "17:45", "18:00", "18:15", "18:30",
        ]),
    },
    friday: DayTimetable {
        loy: times(&[
            "09:15", "09:30", "09:45", "10:15", "10:45", "11:00", "11:15", "12:00", "12:15",
            "12:45", "13:00", "13:15", "13:45", "14:15", "14:30", "14:45", "15:15", "15:30",
            "15:45", "16:45", "17:15", "17:45", "18:15",
        ]),
        sgw: times(&[
            "09:45", "10:00", "10:15", "10:45", "11:15", "11:30", "12:15", "12:30", "13:15",
            "13:45", "14:00", "14:15", "14:45", "15:15", "15:45", "16:00", "16:45", "17:15",
            "17:45", "18:15",
        ]),
    },
    last_updated: None,
});

fn parse_departure(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| Error::InvalidSchedule {
        value: value.to_string(),
    })
}

impl ShuttleSchedule {
    /// Timetable compiled into the library.
    pub fn builtin() -> &'static ShuttleSchedule {
        &FALLBACK_SCHEDULE
    }

    /// Load and validate a timetable from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|err| Error::ConfigLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let schedule = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            last_updated = schedule.last_updated.as_deref().unwrap_or("unknown"),
            "loaded shuttle schedule"
        );
        Ok(schedule)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let schedule: ShuttleSchedule = serde_json::from_reader(reader)?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check that every entry parses as `HH:MM`.
    pub fn validate(&self) -> Result<()> {
        for table in [&self.monday_thursday, &self.friday] {
            for entry in table.sgw.iter().chain(&table.loy) {
                parse_departure(entry)?;
            }
        }
        Ok(())
    }

    /// Timetable in force on `weekday`, or `None` on weekends.
    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DayTimetable> {
        match weekday {
            Weekday::Sat | Weekday::Sun => None,
            Weekday::Fri => Some(&self.friday),
            _ => Some(&self.monday_thursday),
        }
    }

    /// Departure from `campus` matching the rider's constraints.
    ///
    /// In leave mode this is the first departure the rider can reach after
    /// walking `walk_to_minutes` from `target`. In arrive mode it is the
    /// latest departure that still gets them to their destination, including
    /// the ride and `walk_from_minutes`, by `target`.
    pub fn applicable_departure(
        &self,
        campus: Campus,
        target: NaiveDateTime,
        time_mode: TimeMode,
        walk_to_minutes: i64,
        walk_from_minutes: i64,
    ) -> Result<Option<NaiveTime>> {
        let Some(table) = self.for_weekday(target.weekday()) else {
            debug!(weekday = ?target.weekday(), "no shuttle service on weekends");
            return Ok(None);
        };

        let departures = table
            .departures(campus)
            .iter()
            .map(|entry| parse_departure(entry))
            .collect::<Result<Vec<_>>>()?;
        let target = minutes_of_day(target.time());

        let selected = match time_mode {
            TimeMode::Leave => {
                let at_stop = target.saturating_add(walk_to_minutes);
                departures
                    .into_iter()
                    .find(|departure| minutes_of_day(*departure) >= at_stop)
            }
            TimeMode::Arrive => departures.into_iter().rev().find(|departure| {
                minutes_of_day(*departure)
                    .saturating_add(SHUTTLE_RIDE_MINUTES)
                    .saturating_add(walk_from_minutes)
                    <= target
            }),
        };
        Ok(selected)
    }
}

fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

fn add_minutes(time: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    Duration::try_minutes(minutes).and_then(|delta| time.checked_add_signed(delta))
}

fn sub_minutes(time: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    Duration::try_minutes(minutes).and_then(|delta| time.checked_sub_signed(delta))
}

/// Platform-specific path of a user-supplied timetable, when one is set.
pub fn resolve_shuttle_schedule_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(SHUTTLE_SCHEDULE_ENV).map(PathBuf::from))
}

/// Load the timetable from an explicit path or `CAMPUSNAV_SHUTTLE_SCHEDULE`,
/// falling back to the built-in one.
pub fn load_shuttle_schedule(explicit: Option<&Path>) -> Result<ShuttleSchedule> {
    match resolve_shuttle_schedule_path(explicit) {
        Some(path) => ShuttleSchedule::from_path(&path),
        None => {
            debug!("using built-in shuttle schedule");
            Ok(ShuttleSchedule::builtin().clone())
        }
    }
}

/// Campus the shuttle would depart from for a trip, or `None` when the trip
/// does not start and end near opposite stops.
pub fn shuttle_direction(start: Point, destination: Point) -> Option<Campus> {
    [Campus::Sgw, Campus::Loy].into_iter().find(|campus| {
        great_circle_distance_meters(start, campus.stop()) < MAX_WALKING_DISTANCE_M
            && great_circle_distance_meters(destination, campus.other().stop())
                < MAX_WALKING_DISTANCE_M
    })
}

/// Inputs for [`plan_shuttle_route`].
#[derive(Debug, Clone)]
pub struct ShuttleRequest {
    pub start: Point,
    pub destination: Point,
    pub target_time: NaiveDateTime,
    pub time_mode: TimeMode,
    /// Pre-fetched walking route from `start` to the departure stop.
    pub walk_to: Option<RouteData>,
    /// Pre-fetched walking route from the arrival stop to `destination`.
    pub walk_from: Option<RouteData>,
}

impl ShuttleRequest {
    pub fn new(start: Point, destination: Point, target_time: NaiveDateTime) -> Self {
        Self {
            start,
            destination,
            target_time,
            time_mode: TimeMode::Leave,
            walk_to: None,
            walk_from: None,
        }
    }
}

/// A planned shuttle trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShuttleRoute {
    pub route: RouteData,
    pub departing: Campus,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
}

/// One walking portion of the trip, either supplied or synthesised.
struct WalkLeg {
    minutes: i64,
    meters: f64,
    steps: Vec<DirectionStep>,
    points: Vec<Point>,
}

impl WalkLeg {
    fn build(
        supplied: Option<&RouteData>,
        from: Point,
        to: Point,
        instruction: String,
    ) -> WalkLeg {
        let straight = great_circle_distance_meters(from, to);
        match supplied.filter(|route| !route.steps.is_empty()) {
            Some(route) => WalkLeg {
                minutes: parse_duration_label(&route.duration),
                meters: Some(parse_distance_label(&route.distance))
                    .filter(|meters| *meters > 0.0)
                    .unwrap_or(straight),
                steps: route.steps.clone(),
                points: route.polyline_points.clone(),
            },
            None => {
                let minutes = ((straight / FALLBACK_WALK_METERS_PER_MINUTE).round() as i64).max(1);
                WalkLeg {
                    minutes,
                    meters: straight,
                    steps: vec![DirectionStep {
                        instruction,
                        distance: format_distance(Some(straight)),
                        duration: format!("{minutes} min"),
                        start_location: Some(from),
                        end_location: Some(to),
                        travel_mode: Some("WALK".to_string()),
                        transit: None,
                        polyline_points: vec![from, to],
                    }],
                    points: vec![from, to],
                }
            }
        }
    }
}

/// Plan a shuttle trip, or return `Ok(None)` when the trip does not qualify
/// or no departure fits the requested time.
pub fn plan_shuttle_route(
    request: &ShuttleRequest,
    schedule: &ShuttleSchedule,
) -> Result<Option<ShuttleRoute>> {
    let Some(departing) = shuttle_direction(request.start, request.destination) else {
        debug!("trip endpoints are not near opposite shuttle stops");
        return Ok(None);
    };
    let arriving = departing.other();

    let walk_to = WalkLeg::build(
        request.walk_to.as_ref(),
        request.start,
        departing.stop(),
        format!("Walk to {} Shuttle Stop", departing.display_name()),
    );
    let walk_from = WalkLeg::build(
        request.walk_from.as_ref(),
        arriving.stop(),
        request.destination,
        "Walk to destination".to_string(),
    );

    let Some(departure_time) = schedule.applicable_departure(
        departing,
        request.target_time,
        request.time_mode,
        walk_to.minutes,
        walk_from.minutes,
    )?
    else {
        debug!(campus = %departing, "no applicable shuttle departure");
        return Ok(None);
    };

    let departure = request.target_time.date().and_time(departure_time);
    let endpoints = add_minutes(departure, SHUTTLE_RIDE_MINUTES).and_then(|arrival| {
        let (start, end) = match request.time_mode {
            TimeMode::Leave => (
                Some(request.target_time),
                add_minutes(arrival, walk_from.minutes),
            ),
            TimeMode::Arrive => (
                sub_minutes(departure, walk_to.minutes),
                Some(request.target_time),
            ),
        };
        Some((arrival, start?, end?))
    });
    let Some((arrival, trip_start, trip_end)) = endpoints else {
        warn!(
            walk_to_minutes = walk_to.minutes,
            walk_from_minutes = walk_from.minutes,
            "walking legs overflow the calendar; no shuttle trip"
        );
        return Ok(None);
    };
    let eta = match request.time_mode {
        TimeMode::Leave => format!("{} ETA", format_clock(trip_end)),
        TimeMode::Arrive => format!("Leave by {}", format_clock(trip_start)),
    };

    let ride_path: Vec<Point> = match departing {
        Campus::Sgw => SHUTTLE_STREET_PATH.to_vec(),
        Campus::Loy => SHUTTLE_STREET_PATH.iter().rev().copied().collect(),
    };
    let departs_at = departure_time.format("%H:%M").to_string();
    let ride = DirectionStep {
        instruction: format!(
            "Take the Concordia Shuttle to {} (Departs at {departs_at})",
            arriving.display_name()
        ),
        distance: format_distance(Some(SHUTTLE_RIDE_DISTANCE_M)),
        duration: format!("{SHUTTLE_RIDE_MINUTES} min"),
        start_location: Some(departing.stop()),
        end_location: Some(arriving.stop()),
        travel_mode: Some("TRANSIT".to_string()),
        transit: Some(TransitDetails {
            line_name: Some(SHUTTLE_LINE_NAME.to_string()),
            line_short_name: Some(SHUTTLE_LINE_SHORT_NAME.to_string()),
            vehicle_type: Some(SHUTTLE_VEHICLE.to_string()),
            headsign: Some(arriving.display_name().to_string()),
            departure_stop: Some(departing.display_name().to_string()),
            arrival_stop: Some(arriving.display_name().to_string()),
        }),
        polyline_points: ride_path.clone(),
    };

    let path: Vec<Point> = walk_to
        .points
        .iter()
        .chain(&ride_path)
        .chain(&walk_from.points)
        .copied()
        .collect();
    let overview_polyline = encode_polyline(&path);
    let polyline_points = decode_polyline(&overview_polyline)?;

    let mut steps = walk_to.steps;
    steps.push(ride);
    steps.extend(walk_from.steps);

    let total_minutes = ((trip_end - trip_start).num_seconds() as f64 / 60.0).round() as i64;
    let total_meters = walk_to.meters + SHUTTLE_RIDE_DISTANCE_M + walk_from.meters;

    debug!(
        campus = %departing,
        departure = %departs_at,
        total_minutes,
        "planned shuttle trip"
    );

    Ok(Some(ShuttleRoute {
        route: RouteData {
            id: format!("shuttle-{departing}-{}", departure_time.format("%H%M")),
            polyline_points,
            distance: format_distance(Some(total_meters)),
            duration: format_duration_minutes(total_minutes.max(0)),
            eta,
            steps,
            overview_polyline,
            is_shuttle: true,
            request_mode: TravelMode::Transit,
        },
        departing,
        departure,
        arrival,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn builtin_schedule_is_valid() {
        ShuttleSchedule::builtin().validate().unwrap();
    }

    #[test]
    fn street_path_runs_between_stops() {
        assert_eq!(SHUTTLE_STREET_PATH[0], SGW_STOP);
        assert_eq!(SHUTTLE_STREET_PATH[SHUTTLE_STREET_PATH.len() - 1], LOY_STOP);
    }

    #[test]
    fn leave_mode_accounts_for_walk_to_stop() {
        // 2025-03-03 is a Monday.
        let departure = ShuttleSchedule::builtin()
            .applicable_departure(Campus::Sgw, at(2025, 3, 3, 9, 40), TimeMode::Leave, 10, 0)
            .unwrap();
        assert_eq!(departure, NaiveTime::from_hms_opt(10, 0, 0));
    }

    #[test]
    fn no_service_on_weekends() {
        // 2025-03-08 is a Saturday.
        let departure = ShuttleSchedule::builtin()
            .applicable_departure(Campus::Sgw, at(2025, 3, 8, 10, 0), TimeMode::Leave, 0, 0)
            .unwrap();
        assert_eq!(departure, None);
    }

    #[test]
    fn rejects_bad_schedule_entries() {
        let json = r#"{"monday_thursday":{"SGW":["9h30"],"LOY":[]},"friday":{"SGW":[],"LOY":[]}}"#;
        let err = ShuttleSchedule::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidSchedule { .. }));
    }
}
