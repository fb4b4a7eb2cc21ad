//! Repackaging of directions-provider responses into [`RouteData`].
//!
//! The HTTP exchange happens elsewhere; this module only understands the
//! JSON shape of the provider's responses and converts them into the
//! engine's route model, decoding every encoded polyline on the way.
//!
//! Two formats are understood: the Routes API `computeRoutes` body (see
//! [`routes_api`]) and the legacy Directions API body modelled by
//! [`DirectionsResponse`]. [`ProviderResponse`] accepts either.

pub mod routes_api;

use chrono::{Duration, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

pub use routes_api::{routes_from_routes_api, RoutesApiResponse};

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::polyline::decode_polyline;
use crate::route::{DirectionStep, RouteData, TimeMode, TransitDetails, TravelMode};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
const NO_ROUTE_FOUND: &str = "No route found between these locations";
const LEGACY_PROVIDER: &str = "Directions API";

/// Target times in the past are moved this far past "now".
const PAST_TARGET_GRACE_SECS: i64 = 10;

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]{0,1000}>").expect("static tag pattern compiles"));
static HOURS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*h").expect("static hours pattern compiles"));
static MINUTES_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*min").expect("static minutes pattern compiles"));

// --- Provider response model ----------------------------------------------

/// A provider response in either supported format.
///
/// Legacy bodies always carry a top-level `status`; anything else is read
/// as a Routes API body.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProviderResponse {
    Legacy(DirectionsResponse),
    RoutesApi(RoutesApiResponse),
}

impl ProviderResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert with the conversion rules of the detected format.
    pub fn routes(&self, context: &RequestContext) -> Result<Vec<RouteData>> {
        match self {
            ProviderResponse::Legacy(response) => routes_from_response(response, context),
            ProviderResponse::RoutesApi(response) => routes_from_routes_api(response, context),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<ProviderRoute>,
}

impl DirectionsResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderRoute {
    #[serde(default)]
    pub overview_polyline: Option<EncodedPolyline>,
    #[serde(default)]
    pub legs: Vec<ProviderLeg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncodedPolyline {
    #[serde(default)]
    pub points: Option<String>,
}

/// Provider measurement: display text plus raw value (metres or seconds).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderLeg {
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
    #[serde(default)]
    pub steps: Vec<ProviderStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderLatLng {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl ProviderLatLng {
    fn to_point(&self) -> Option<Point> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Point::new(lat, lng))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderStep {
    #[serde(default)]
    pub html_instructions: Option<String>,
    #[serde(default)]
    pub travel_mode: Option<String>,
    #[serde(default)]
    pub start_location: Option<ProviderLatLng>,
    #[serde(default)]
    pub end_location: Option<ProviderLatLng>,
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
    #[serde(default)]
    pub polyline: Option<EncodedPolyline>,
    #[serde(default)]
    pub transit_details: Option<ProviderTransit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderTransit {
    #[serde(default)]
    pub headsign: Option<String>,
    #[serde(default)]
    pub departure_stop: Option<NamedStop>,
    #[serde(default)]
    pub arrival_stop: Option<NamedStop>,
    #[serde(default)]
    pub line: Option<ProviderLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedStop {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderLine {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub vehicle: Option<ProviderVehicle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderVehicle {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// --- Conversion -----------------------------------------------------------

/// Parameters of the request that produced a response.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub mode: TravelMode,
    pub time_mode: TimeMode,
    pub target_time: Option<NaiveDateTime>,
    pub now: NaiveDateTime,
}

impl RequestContext {
    pub fn new(mode: TravelMode, now: NaiveDateTime) -> Self {
        Self {
            mode,
            time_mode: TimeMode::Leave,
            target_time: None,
            now,
        }
    }

    /// Target time with past values moved just after `now`.
    pub fn effective_target_time(&self) -> Option<NaiveDateTime> {
        self.target_time.map(|target| {
            if target < self.now {
                self.now
                    .checked_add_signed(Duration::seconds(PAST_TARGET_GRACE_SECS))
                    .unwrap_or(self.now)
            } else {
                target
            }
        })
    }
}

/// Convert a provider response into candidate routes.
///
/// Routes missing their first leg, overview polyline, leg distance or leg
/// duration are skipped, as are routes whose overview polyline is malformed.
pub fn routes_from_response(
    response: &DirectionsResponse,
    context: &RequestContext,
) -> Result<Vec<RouteData>> {
    if response.status != STATUS_OK || response.routes.is_empty() {
        let message = response.error_message.clone().unwrap_or_else(|| {
            if response.status == STATUS_ZERO_RESULTS || response.status == STATUS_OK {
                NO_ROUTE_FOUND.to_string()
            } else {
                format!("Directions API error: {}", response.status)
            }
        });
        return Err(Error::ProviderStatus {
            status: response.status.clone(),
            message,
        });
    }

    let target_time = context.effective_target_time();
    let routes: Vec<RouteData> = response
        .routes
        .iter()
        .enumerate()
        .filter_map(|(index, route)| convert_route(index, route, context, target_time))
        .collect();

    if routes.is_empty() {
        return Err(Error::NoRoutes {
            provider: LEGACY_PROVIDER,
        });
    }

    debug!(
        routes = routes.len(),
        provided = response.routes.len(),
        mode = %context.mode,
        "repackaged directions response"
    );
    Ok(routes)
}

fn convert_route(
    index: usize,
    route: &ProviderRoute,
    context: &RequestContext,
    target_time: Option<NaiveDateTime>,
) -> Option<RouteData> {
    let leg = route.legs.first()?;
    let overview = route.overview_polyline.as_ref()?.points.as_deref()?;
    let (distance, duration) = (leg.distance.as_ref()?, leg.duration.as_ref()?);

    let polyline_points = decode_overview(index, overview)?;
    let eta = route_eta(index, duration.value, target_time, context)?;

    Some(RouteData {
        id: format!("route-{index}"),
        polyline_points,
        distance: distance.text.clone(),
        duration: duration.text.clone(),
        eta,
        steps: leg.steps.iter().map(convert_step).collect(),
        overview_polyline: overview.to_string(),
        is_shuttle: false,
        request_mode: context.mode,
    })
}

fn convert_step(step: &ProviderStep) -> DirectionStep {
    let transit = step.transit_details.as_ref().map(|details| {
        let line = details.line.as_ref();
        TransitDetails {
            line_name: line.and_then(|l| l.name.clone()),
            line_short_name: line.and_then(|l| l.short_name.clone()),
            vehicle_type: line
                .and_then(|l| l.vehicle.as_ref())
                .and_then(|v| v.kind.clone()),
            headsign: details.headsign.clone(),
            departure_stop: details.departure_stop.as_ref().and_then(|s| s.name.clone()),
            arrival_stop: details.arrival_stop.as_ref().and_then(|s| s.name.clone()),
        }
    });

    let line = step
        .transit_details
        .as_ref()
        .and_then(|details| details.line.as_ref());
    let instruction = instruction_text(
        step.html_instructions.as_deref(),
        &InstructionHints {
            travel_mode: step.travel_mode.as_deref(),
            vehicle_name: line
                .and_then(|l| l.vehicle.as_ref())
                .and_then(|v| v.name.as_deref()),
            line_short_name: line.and_then(|l| l.short_name.as_deref()),
            headsign: step
                .transit_details
                .as_ref()
                .and_then(|d| d.headsign.as_deref()),
        },
    );

    DirectionStep {
        instruction,
        distance: format_distance(step.distance.as_ref().map(|d| d.value)),
        duration: step
            .duration
            .as_ref()
            .map(|d| d.text.clone())
            .unwrap_or_default(),
        start_location: step.start_location.as_ref().and_then(ProviderLatLng::to_point),
        end_location: step.end_location.as_ref().and_then(ProviderLatLng::to_point),
        travel_mode: step.travel_mode.clone(),
        transit: transit.filter(|t| !t.is_empty()),
        polyline_points: decode_step_polyline(
            step.polyline.as_ref().and_then(|p| p.points.as_deref()),
        ),
    }
}

/// Decoded overview polyline, or `None` (logged) when it is malformed.
fn decode_overview(index: usize, overview: &str) -> Option<Vec<Point>> {
    match decode_polyline(overview) {
        Ok(points) => Some(points),
        Err(error) => {
            warn!(%error, route = index, "skipping route with malformed overview polyline");
            None
        }
    }
}

fn decode_step_polyline(encoded: Option<&str>) -> Vec<Point> {
    match encoded {
        Some(encoded) => decode_polyline(encoded).unwrap_or_else(|error| {
            warn!(%error, "dropping malformed step polyline");
            Vec::new()
        }),
        None => Vec::new(),
    }
}

/// ETA label for a route, or `None` (logged) when the arrival time cannot be
/// represented.
fn route_eta(
    index: usize,
    duration_secs: f64,
    target_time: Option<NaiveDateTime>,
    context: &RequestContext,
) -> Option<String> {
    let eta = calculate_eta(duration_secs, target_time, context.time_mode, context.now);
    if eta.is_none() {
        warn!(
            route = index,
            duration_secs, "skipping route whose duration overflows the calendar"
        );
    }
    eta
}

/// Transit and mode fields consulted when an instruction must be
/// synthesised.
#[derive(Debug, Clone, Copy, Default)]
struct InstructionHints<'a> {
    travel_mode: Option<&'a str>,
    vehicle_name: Option<&'a str>,
    line_short_name: Option<&'a str>,
    headsign: Option<&'a str>,
}

/// Instruction text for a step, synthesised from its travel mode when the
/// provider sent nothing useful.
fn instruction_text(raw: Option<&str>, hints: &InstructionHints<'_>) -> String {
    let instruction = strip_html(raw);
    if instruction != "Continue" {
        return instruction;
    }

    match hints
        .travel_mode
        .unwrap_or_default()
        .to_ascii_uppercase()
        .as_str()
    {
        "TRANSIT" => {
            let vehicle = hints.vehicle_name.unwrap_or("Transit");
            let short_name = hints.line_short_name.unwrap_or("");
            let headsign = hints
                .headsign
                .map(|h| format!(" toward {h}"))
                .unwrap_or_default();
            format!("Take {vehicle} {short_name}{headsign}")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        }
        "WALK" | "WALKING" => "Walk to next location".to_string(),
        _ => "Continue on route".to_string(),
    }
}

// --- Label helpers --------------------------------------------------------

/// Remove HTML tags from a provider instruction; empty input becomes
/// `"Continue"`.
pub fn strip_html(input: Option<&str>) -> String {
    let stripped = input
        .map(|text| HTML_TAG.replace_all(text, "").trim().to_string())
        .unwrap_or_default();
    if stripped.is_empty() {
        "Continue".to_string()
    } else {
        stripped
    }
}

/// Human-readable distance: `"0 m"`, `"<n> m"` below a kilometre, else
/// `"<x.y> km"`.
pub fn format_distance(meters: Option<f64>) -> String {
    match meters {
        Some(m) if m > 0.0 && m < 1000.0 => format!("{} m", m.round()),
        Some(m) if m >= 1000.0 => format!("{:.1} km", m / 1000.0),
        _ => "0 m".to_string(),
    }
}

/// Seconds in a Routes API duration string such as `"754s"`; zero when the
/// value is missing or unparsable.
pub fn parse_duration_seconds(value: Option<&str>) -> f64 {
    value
        .and_then(|text| text.trim().trim_end_matches('s').parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite())
        .unwrap_or(0.0)
}

/// Human-readable duration from seconds, rounded to whole minutes (at
/// least one for any positive duration).
pub fn format_duration_secs(seconds: f64) -> String {
    if seconds.is_nan() || seconds <= 0.0 {
        return "0 min".to_string();
    }

    let total_minutes = ((seconds / 60.0).round() as i64).max(1);
    format_duration_minutes(total_minutes)
}

/// `"<m> min"`, `"<h> h"` or `"<h> h <m> min"`.
pub fn format_duration_minutes(total_minutes: i64) -> String {
    if total_minutes < 60 {
        return format!("{total_minutes} min");
    }
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    if minutes > 0 {
        format!("{hours} h {minutes} min")
    } else {
        format!("{hours} h")
    }
}

/// Whole minutes in a duration label such as `"1 h 5 min"`; zero when the
/// label carries no recognisable parts. Oversized labels saturate at
/// `i64::MAX`.
pub fn parse_duration_label(label: &str) -> i64 {
    let capture = |pattern: &Regex| {
        pattern
            .captures(label)
            .and_then(|c| c[1].parse::<i64>().ok())
            .unwrap_or(0)
    };
    capture(&HOURS_LABEL)
        .saturating_mul(60)
        .saturating_add(capture(&MINUTES_LABEL))
}

/// Metres in a distance label such as `"850 m"` or `"1.2 km"`.
pub fn parse_distance_label(label: &str) -> f64 {
    let digits: String = label
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value = digits.parse::<f64>().unwrap_or(0.0);
    if label.contains("km") {
        value * 1000.0
    } else {
        value
    }
}

/// Wall-clock label `H:MM` (hour not zero-padded).
pub fn format_clock(time: NaiveDateTime) -> String {
    format!("{}:{:02}", time.hour(), time.minute())
}

/// ETA label for a route taking `duration_secs`.
///
/// In arrive mode with a target time, the target is the ETA. Otherwise the
/// trip starts at the target time (or `now`). Returns `None` when the
/// arrival lies beyond the representable calendar.
pub fn calculate_eta(
    duration_secs: f64,
    target_time: Option<NaiveDateTime>,
    time_mode: TimeMode,
    now: NaiveDateTime,
) -> Option<String> {
    if let (TimeMode::Arrive, Some(target)) = (time_mode, target_time) {
        return Some(format!("{} ETA", format_clock(target)));
    }

    let start = target_time.unwrap_or(now);
    let seconds = if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs.round() as i64
    } else {
        0
    };
    let arrival =
        Duration::try_seconds(seconds).and_then(|delta| start.checked_add_signed(delta))?;
    Some(format!("{} ETA", format_clock(arrival)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_defaults_to_continue() {
        assert_eq!(
            strip_html(Some("Turn <b>left</b> onto <div style=\"x\">Rue Guy</div>")),
            "Turn left onto Rue Guy"
        );
        assert_eq!(strip_html(Some("  <br/> ")), "Continue");
        assert_eq!(strip_html(None), "Continue");
    }

    #[test]
    fn formats_distances() {
        assert_eq!(format_distance(None), "0 m");
        assert_eq!(format_distance(Some(0.0)), "0 m");
        assert_eq!(format_distance(Some(412.4)), "412 m");
        assert_eq!(format_distance(Some(1549.0)), "1.5 km");
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration_secs(0.0), "0 min");
        assert_eq!(format_duration_secs(20.0), "1 min");
        assert_eq!(format_duration_secs(600.0), "10 min");
        assert_eq!(format_duration_secs(3600.0), "1 h");
        assert_eq!(format_duration_secs(3900.0), "1 h 5 min");
    }

    #[test]
    fn parses_labels() {
        assert_eq!(parse_duration_label("1 h 5 min"), 65);
        assert_eq!(parse_duration_label("12 mins"), 12);
        assert_eq!(parse_duration_label(""), 0);
        assert_eq!(parse_distance_label("1.2 km"), 1200.0);
        assert_eq!(parse_distance_label("850 m"), 850.0);
    }

    #[test]
    fn transit_instruction_is_synthesised() {
        let step = ProviderStep {
            travel_mode: Some("TRANSIT".to_string()),
            transit_details: Some(ProviderTransit {
                headsign: Some("Angrignon".to_string()),
                line: Some(ProviderLine {
                    short_name: Some("1".to_string()),
                    vehicle: Some(ProviderVehicle {
                        name: Some("Subway".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(convert_step(&step).instruction, "Take Subway 1 toward Angrignon");
    }

    #[test]
    fn walking_and_unknown_modes_get_generic_instructions() {
        let walk = InstructionHints {
            travel_mode: Some("walk"),
            ..Default::default()
        };
        assert_eq!(instruction_text(Some(""), &walk), "Walk to next location");
        assert_eq!(
            instruction_text(None, &InstructionHints::default()),
            "Continue on route"
        );
        assert_eq!(instruction_text(Some("Turn <b>left</b>"), &walk), "Turn left");
    }

    #[test]
    fn oversized_duration_labels_saturate() {
        assert_eq!(parse_duration_label("9999999999999999 h"), 9_999_999_999_999_999 * 60);
        assert_eq!(parse_duration_label("999999999999999999 h 5 min"), i64::MAX);
    }

    #[test]
    fn parses_routes_api_durations() {
        assert_eq!(parse_duration_seconds(Some("754s")), 754.0);
        assert_eq!(parse_duration_seconds(Some("12.5s")), 12.5);
        assert_eq!(parse_duration_seconds(Some("soon")), 0.0);
        assert_eq!(parse_duration_seconds(None), 0.0);
    }
}
