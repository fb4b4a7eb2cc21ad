use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the campus navigation library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a centroid is requested for a ring without vertices.
    #[error("cannot compute the centroid of an empty coordinate sequence")]
    EmptyCentroidInput,

    /// Raised when an encoded polyline ends mid-chunk or contains bytes
    /// outside the encoding alphabet.
    #[error("malformed polyline at byte {position}: {reason}")]
    MalformedPolyline { position: usize, reason: String },

    /// Raised when a geographic point lies outside a floor's bounding box.
    #[error("point ({latitude}, {longitude}) lies outside the floor bounds")]
    OutOfBounds { latitude: f64, longitude: f64 },

    /// Raised when a bounding box or local extent has zero span on an axis.
    #[error("floor bounds or extent have zero span: {message}")]
    DegenerateBounds { message: String },

    /// Raised when a floor artwork `viewBox` attribute cannot be parsed.
    #[error("invalid viewBox '{value}'; expected four numbers 'min-x min-y width height'")]
    InvalidViewBox { value: String },

    /// Raised when a building id is not present in the indoor catalog.
    #[error("unknown building: {name}{}", format_suggestions(.suggestions))]
    UnknownBuilding {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a building configuration declares no floors.
    #[error("building {building} has no floors configured")]
    NoFloors { building: String },

    /// Raised when the directions provider reports a non-OK status.
    #[error("{message}")]
    ProviderStatus { status: String, message: String },

    /// Raised when no usable route survives repackaging of a provider response.
    #[error("No route polyline returned from {provider}")]
    NoRoutes { provider: &'static str },

    /// Raised when a shuttle schedule entry cannot be parsed as `HH:MM`.
    #[error("invalid shuttle schedule entry '{value}'")]
    InvalidSchedule { value: String },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for configuration lookup")]
    ConfigDirsUnavailable,

    /// Raised when a configuration file could not be read.
    #[error("failed to load configuration from {path}: {message}")]
    ConfigLoad { path: PathBuf, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
