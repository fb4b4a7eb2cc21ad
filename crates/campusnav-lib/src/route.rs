use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Point;
use crate::polyline::decode_polyline;

/// Travel modes understood by the directions provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Walking,
    Driving,
    Transit,
    Bicycling,
}

impl TravelMode {
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Walking,
        TravelMode::Driving,
        TravelMode::Transit,
        TravelMode::Bicycling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Driving => "driving",
            TravelMode::Transit => "transit",
            TravelMode::Bicycling => "bicycling",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "walking" | "walk" => Ok(TravelMode::Walking),
            "driving" | "drive" => Ok(TravelMode::Driving),
            "transit" => Ok(TravelMode::Transit),
            "bicycling" | "bicycle" => Ok(TravelMode::Bicycling),
            other => Err(format!(
                "unknown travel mode '{other}'; expected walking, driving, transit or bicycling"
            )),
        }
    }
}

/// Whether a target time is a departure or an arrival constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    #[default]
    Leave,
    Arrive,
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeMode::Leave => "leave",
            TimeMode::Arrive => "arrive",
        })
    }
}

impl FromStr for TimeMode {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "leave" | "depart" => Ok(TimeMode::Leave),
            "arrive" => Ok(TimeMode::Arrive),
            other => Err(format!(
                "unknown time mode '{other}'; expected leave or arrive"
            )),
        }
    }
}

/// Transit metadata attached to a step that rides a vehicle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransitDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headsign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_stop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_stop: Option<String>,
}

impl TransitDetails {
    pub fn is_empty(&self) -> bool {
        *self == TransitDetails::default()
    }
}

/// One turn-by-turn instruction within a route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionStep {
    pub instruction: String,
    pub distance: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_location: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<Point>,
    /// Provider travel mode label for the step (e.g. `WALKING`, `TRANSIT`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit: Option<TransitDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub polyline_points: Vec<Point>,
}

/// A candidate route returned by the directions provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
    pub id: String,
    /// Decoded form of `overview_polyline`.
    pub polyline_points: Vec<Point>,
    pub distance: String,
    pub duration: String,
    pub eta: String,
    pub steps: Vec<DirectionStep>,
    /// Provider-encoded polyline; the source of truth for `polyline_points`.
    pub overview_polyline: String,
    #[serde(default)]
    pub is_shuttle: bool,
    pub request_mode: TravelMode,
}

impl RouteData {
    /// Build a route whose points are decoded from `overview_polyline`.
    pub fn from_overview(
        id: impl Into<String>,
        overview_polyline: impl Into<String>,
        request_mode: TravelMode,
    ) -> Result<Self> {
        let overview_polyline = overview_polyline.into();
        let polyline_points = decode_polyline(&overview_polyline)?;
        Ok(Self {
            id: id.into(),
            polyline_points,
            distance: String::new(),
            duration: String::new(),
            eta: String::new(),
            steps: Vec::new(),
            overview_polyline,
            is_shuttle: false,
            request_mode,
        })
    }

    /// Re-run the decoder over `overview_polyline`.
    pub fn redecode(&self) -> Result<Vec<Point>> {
        decode_polyline(&self.overview_polyline)
    }
}
