mod common;

use campusnav_lib::shuttle::{LOY_STOP, SGW_STOP, SHUTTLE_STREET_PATH};
use campusnav_lib::{
    decode_polyline, load_shuttle_schedule, plan_shuttle_route, Campus, DirectionStep, Point,
    RouteData, ShuttleRequest, ShuttleSchedule, TimeMode, TravelMode,
};
use chrono::NaiveTime;

use common::{at, fixtures_dir};

fn builtin() -> &'static ShuttleSchedule {
    ShuttleSchedule::builtin()
}

#[test]
fn leave_mode_picks_next_reachable_departure() {
    // 2025-03-03 is a Monday.
    let request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 10, 0));
    let planned = plan_shuttle_route(&request, builtin())
        .expect("schedule is valid")
        .expect("trip qualifies");

    assert_eq!(planned.departing, Campus::Sgw);
    assert_eq!(planned.departure, at(2025, 3, 3, 10, 15));
    assert_eq!(planned.arrival, at(2025, 3, 3, 10, 45));

    let route = &planned.route;
    assert!(route.is_shuttle);
    assert_eq!(route.request_mode, TravelMode::Transit);
    assert_eq!(route.eta, "10:46 ETA");
    assert_eq!(route.duration, "46 min");
    assert_eq!(route.distance, "7.2 km");
    assert_eq!(route.id, "shuttle-SGW-1015");
}

#[test]
fn assembled_route_has_walk_ride_walk_steps() {
    let request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 10, 0));
    let route = plan_shuttle_route(&request, builtin())
        .unwrap()
        .unwrap()
        .route;

    let instructions: Vec<&str> = route.steps.iter().map(|s| s.instruction.as_str()).collect();
    assert_eq!(
        instructions,
        vec![
            "Walk to SGW Hall Building Shuttle Stop",
            "Take the Concordia Shuttle to Loyola Campus (Departs at 10:15)",
            "Walk to destination",
        ]
    );

    let ride = &route.steps[1];
    assert_eq!(ride.distance, "7.2 km");
    assert_eq!(ride.duration, "30 min");
    assert_eq!(ride.travel_mode.as_deref(), Some("TRANSIT"));
    let transit = ride.transit.as_ref().unwrap();
    assert_eq!(transit.line_name.as_deref(), Some("Concordia Student Shuttle"));
    assert_eq!(transit.line_short_name.as_deref(), Some("C"));
    assert_eq!(transit.vehicle_type.as_deref(), Some("Shuttle"));
    assert_eq!(ride.polyline_points, SHUTTLE_STREET_PATH.to_vec());

    assert_eq!(route.steps[0].duration, "1 min");
    assert_eq!(route.steps[0].travel_mode.as_deref(), Some("WALK"));
}

#[test]
fn overview_polyline_is_authoritative() {
    let request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 10, 0));
    let route = plan_shuttle_route(&request, builtin())
        .unwrap()
        .unwrap()
        .route;

    assert_eq!(decode_polyline(&route.overview_polyline).unwrap(), route.polyline_points);
    assert_eq!(route.polyline_points.len(), SHUTTLE_STREET_PATH.len() + 4);

    let first = route.polyline_points[0];
    assert!((first.latitude - SGW_STOP.latitude).abs() < 1e-5);
    assert!((first.longitude - SGW_STOP.longitude).abs() < 1e-5);
}

#[test]
fn arrive_mode_picks_latest_departure_that_arrives_in_time() {
    let mut request = ShuttleRequest::new(LOY_STOP, SGW_STOP, at(2025, 3, 3, 12, 0));
    request.time_mode = TimeMode::Arrive;

    let planned = plan_shuttle_route(&request, builtin()).unwrap().unwrap();
    assert_eq!(planned.departing, Campus::Loy);
    assert_eq!(planned.departure, at(2025, 3, 3, 11, 15));
    assert_eq!(planned.route.eta, "Leave by 11:14");
    assert_eq!(planned.route.duration, "46 min");

    // The ride runs the street path in reverse.
    let ride = &planned.route.steps[1];
    assert_eq!(ride.polyline_points.first(), Some(&LOY_STOP));
    assert_eq!(ride.polyline_points.last(), Some(&SGW_STOP));
    assert!(ride.instruction.contains("to SGW Hall Building"));
}

#[test]
fn supplied_walking_legs_replace_synthesised_ones() {
    let walk_to = RouteData {
        id: "walk".to_string(),
        polyline_points: vec![Point::new(45.4600, -73.6400), SGW_STOP],
        distance: "900 m".to_string(),
        duration: "12 min".to_string(),
        eta: String::new(),
        steps: vec![DirectionStep {
            instruction: "Head west on Sherbrooke".to_string(),
            distance: "900 m".to_string(),
            duration: "12 min".to_string(),
            ..DirectionStep::default()
        }],
        overview_polyline: String::new(),
        is_shuttle: false,
        request_mode: TravelMode::Walking,
    };

    let mut request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 10, 0));
    request.walk_to = Some(walk_to);

    let planned = plan_shuttle_route(&request, builtin()).unwrap().unwrap();
    // Reaches the stop at 10:12.
    assert_eq!(planned.departure, at(2025, 3, 3, 10, 15));
    assert_eq!(planned.route.steps[0].instruction, "Head west on Sherbrooke");
    assert_eq!(planned.route.distance, "8.1 km");
}

#[test]
fn walking_time_can_push_past_a_departure() {
    // The synthesised walk to the stop takes one minute.
    let request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 10, 14));
    let planned = plan_shuttle_route(&request, builtin()).unwrap().unwrap();
    assert_eq!(planned.departure, at(2025, 3, 3, 10, 15));

    let request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 10, 15));
    let planned = plan_shuttle_route(&request, builtin()).unwrap().unwrap();
    assert_eq!(planned.departure, at(2025, 3, 3, 10, 30));
}

#[test]
fn trips_that_do_not_qualify_return_none() {
    // Both ends near the same stop.
    let request = ShuttleRequest::new(SGW_STOP, SGW_STOP, at(2025, 3, 3, 10, 0));
    assert!(plan_shuttle_route(&request, builtin()).unwrap().is_none());

    // 2025-03-08 is a Saturday.
    let request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 8, 10, 0));
    assert!(plan_shuttle_route(&request, builtin()).unwrap().is_none());

    // After the last Monday departure.
    let request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 18, 45));
    assert!(plan_shuttle_route(&request, builtin()).unwrap().is_none());
}

#[test]
fn friday_uses_its_own_timetable() {
    let schedule = load_shuttle_schedule(Some(&fixtures_dir().join("shuttle_schedule.json")))
        .expect("fixture schedule loads");
    assert_eq!(schedule.last_updated.as_deref(), Some("2025-01-06"));

    // 2025-03-07 is a Friday.
    let departure = schedule
        .applicable_departure(Campus::Sgw, at(2025, 3, 7, 9, 0), TimeMode::Leave, 5, 5)
        .unwrap();
    assert_eq!(departure, NaiveTime::from_hms_opt(10, 0, 0));

    let departure = schedule
        .applicable_departure(Campus::Sgw, at(2025, 3, 6, 9, 0), TimeMode::Leave, 5, 5)
        .unwrap();
    assert_eq!(departure, NaiveTime::from_hms_opt(9, 30, 0));
}

fn endless_walk() -> RouteData {
    RouteData {
        id: "walk".to_string(),
        polyline_points: vec![LOY_STOP],
        distance: "900 m".to_string(),
        duration: "999999999999999999 h".to_string(),
        eta: String::new(),
        steps: vec![DirectionStep {
            instruction: "Keep walking".to_string(),
            ..DirectionStep::default()
        }],
        overview_polyline: String::new(),
        is_shuttle: false,
        request_mode: TravelMode::Walking,
    }
}

#[test]
fn oversized_walking_legs_yield_no_trip() {
    let mut request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 10, 0));
    request.walk_from = Some(endless_walk());
    assert!(plan_shuttle_route(&request, builtin()).unwrap().is_none());

    let mut request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 10, 0));
    request.walk_to = Some(endless_walk());
    assert!(plan_shuttle_route(&request, builtin()).unwrap().is_none());

    let mut request = ShuttleRequest::new(SGW_STOP, LOY_STOP, at(2025, 3, 3, 12, 0));
    request.time_mode = TimeMode::Arrive;
    request.walk_to = Some(endless_walk());
    assert!(plan_shuttle_route(&request, builtin()).unwrap().is_none());
}
