//! Routes API (`directions/v2:computeRoutes`) response model and conversion.
//!
//! Field names follow the API's camelCase JSON. Distances arrive as raw
//! metres and durations as `"<seconds>s"` strings, so the labels on
//! [`RouteData`] are formatted here rather than copied.

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::route::{DirectionStep, RouteData, TransitDetails};

use super::{
    decode_overview, decode_step_polyline, format_distance, format_duration_secs,
    instruction_text, parse_duration_seconds, route_eta, InstructionHints, NamedStop,
    RequestContext, NO_ROUTE_FOUND,
};

const ROUTES_API_PROVIDER: &str = "API";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
const STATUS_ERROR: &str = "ERROR";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesApiResponse {
    #[serde(default)]
    pub routes: Vec<ApiRoute>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

impl RoutesApiResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Error body returned alongside a non-success HTTP status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoute {
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub polyline: Option<ApiPolyline>,
    #[serde(default)]
    pub legs: Vec<ApiLeg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPolyline {
    #[serde(default)]
    pub encoded_polyline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLeg {
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub steps: Vec<ApiStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStep {
    #[serde(default)]
    pub travel_mode: Option<String>,
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub static_duration: Option<String>,
    #[serde(default)]
    pub start_location: Option<ApiLocation>,
    #[serde(default)]
    pub end_location: Option<ApiLocation>,
    #[serde(default)]
    pub navigation_instruction: Option<ApiNavigationInstruction>,
    #[serde(default)]
    pub polyline: Option<ApiPolyline>,
    #[serde(default)]
    pub transit_details: Option<ApiTransit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    #[serde(default)]
    pub lat_lng: Option<ApiLatLng>,
}

impl ApiLocation {
    fn to_point(&self) -> Option<Point> {
        let lat_lng = self.lat_lng.as_ref()?;
        match (lat_lng.latitude, lat_lng.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Point::new(lat, lng))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiLatLng {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiNavigationInstruction {
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTransit {
    #[serde(default)]
    pub headsign: Option<String>,
    #[serde(default)]
    pub stop_details: Option<ApiStopDetails>,
    #[serde(default)]
    pub transit_line: Option<ApiTransitLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStopDetails {
    #[serde(default)]
    pub arrival_stop: Option<NamedStop>,
    #[serde(default)]
    pub departure_stop: Option<NamedStop>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTransitLine {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_short: Option<String>,
    #[serde(default)]
    pub vehicle: Option<ApiVehicle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiVehicle {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<LocalizedText>,
}

impl ApiVehicle {
    fn display_name(&self) -> Option<&str> {
        self.name.as_ref().and_then(|name| name.text.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub text: Option<String>,
}

/// Convert a Routes API response into candidate routes.
///
/// Route-level distance and duration take precedence over the first leg's.
/// Routes without a first leg or an overview polyline are skipped.
pub fn routes_from_routes_api(
    response: &RoutesApiResponse,
    context: &RequestContext,
) -> Result<Vec<RouteData>> {
    if let Some(error) = &response.error {
        let message = error.message.clone().unwrap_or_else(|| match error.code {
            Some(code) => format!("Routes API request failed with status {code}"),
            None => "Routes API request failed".to_string(),
        });
        return Err(Error::ProviderStatus {
            status: error
                .status
                .clone()
                .unwrap_or_else(|| STATUS_ERROR.to_string()),
            message,
        });
    }

    if response.routes.is_empty() {
        return Err(Error::ProviderStatus {
            status: STATUS_ZERO_RESULTS.to_string(),
            message: NO_ROUTE_FOUND.to_string(),
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
            provider: ROUTES_API_PROVIDER,
        });
    }

    debug!(
        routes = routes.len(),
        provided = response.routes.len(),
        mode = %context.mode,
        "repackaged routes api response"
    );
    Ok(routes)
}

fn convert_route(
    index: usize,
    route: &ApiRoute,
    context: &RequestContext,
    target_time: Option<NaiveDateTime>,
) -> Option<RouteData> {
    let leg = route.legs.first()?;
    let overview = route
        .polyline
        .as_ref()?
        .encoded_polyline
        .as_deref()
        .filter(|encoded| !encoded.is_empty())?;

    let polyline_points = decode_overview(index, overview)?;
    let seconds = parse_duration_seconds(route.duration.as_deref().or(leg.duration.as_deref()));
    let eta = route_eta(index, seconds, target_time, context)?;

    Some(RouteData {
        id: format!("route-{index}"),
        polyline_points,
        distance: format_distance(route.distance_meters.or(leg.distance_meters)),
        duration: format_duration_secs(seconds),
        eta,
        steps: leg.steps.iter().map(convert_step).collect(),
        overview_polyline: overview.to_string(),
        is_shuttle: false,
        request_mode: context.mode,
    })
}

fn convert_step(step: &ApiStep) -> DirectionStep {
    let details = step.transit_details.as_ref();
    let line = details.and_then(|d| d.transit_line.as_ref());
    let vehicle = line.and_then(|l| l.vehicle.as_ref());
    let stops = details.and_then(|d| d.stop_details.as_ref());

    let transit = details.map(|details| TransitDetails {
        line_name: line.and_then(|l| l.name.clone()),
        line_short_name: line.and_then(|l| l.name_short.clone()),
        vehicle_type: vehicle
            .and_then(|v| v.display_name().or(v.kind.as_deref()))
            .map(str::to_string),
        headsign: details.headsign.clone(),
        departure_stop: stops
            .and_then(|s| s.departure_stop.as_ref())
            .and_then(|s| s.name.clone()),
        arrival_stop: stops
            .and_then(|s| s.arrival_stop.as_ref())
            .and_then(|s| s.name.clone()),
    });

    let instruction = instruction_text(
        step.navigation_instruction
            .as_ref()
            .and_then(|n| n.instructions.as_deref()),
        &InstructionHints {
            travel_mode: step.travel_mode.as_deref(),
            vehicle_name: vehicle.and_then(ApiVehicle::display_name),
            line_short_name: line.and_then(|l| l.name_short.as_deref()),
            headsign: details.and_then(|d| d.headsign.as_deref()),
        },
    );

    DirectionStep {
        instruction,
        distance: format_distance(step.distance_meters),
        duration: format_duration_secs(parse_duration_seconds(step.static_duration.as_deref())),
        start_location: step.start_location.as_ref().and_then(ApiLocation::to_point),
        end_location: step.end_location.as_ref().and_then(ApiLocation::to_point),
        travel_mode: step.travel_mode.clone(),
        transit: transit.filter(|t| !t.is_empty()),
        polyline_points: decode_step_polyline(
            step.polyline
                .as_ref()
                .and_then(|p| p.encoded_polyline.as_deref()),
        ),
    }
}
