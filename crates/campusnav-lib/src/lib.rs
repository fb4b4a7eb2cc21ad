//! Campus navigation engine.
//!
//! This crate holds the platform-independent core of the campus navigation
//! client: geographic primitives, the encoded-polyline codec, affine mapping
//! between map coordinates and indoor floor plans, zoom-dependent label
//! styling, directions-response repackaging, shuttle planning and the
//! navigation session state machine. Front ends (the CLI, mobile shells)
//! should depend on the items exported here instead of reimplementing them.
//!

#![deny(warnings)]

pub mod directions;
pub mod error;
pub mod geometry;
pub mod indoor;
pub mod labels;
pub mod polyline;
pub mod route;
pub mod session;
pub mod shuttle;

pub use directions::{
    routes_from_response, routes_from_routes_api, DirectionsResponse, ProviderResponse,
    RequestContext, RoutesApiResponse,
};
pub use error::{Error, Result};
pub use geometry::{
    centroid, geojson_ring_centroid, great_circle_distance_meters, point_in_polygon,
    polygon_from_geojson, Point,
};
pub use indoor::{load_indoor_catalog, Bounds, IndoorCatalog, LocalExtent, LocalPoint};
pub use labels::{is_label_visible, label_font_size, label_style, LabelStyle};
pub use polyline::{decode_polyline, encode_polyline};
pub use route::{DirectionStep, RouteData, TimeMode, TransitDetails, TravelMode};
pub use session::{Endpoint, NavigationSession, RequestToken, SessionConfig};
pub use shuttle::{
    load_shuttle_schedule, plan_shuttle_route, Campus, ShuttleRequest, ShuttleRoute,
    ShuttleSchedule,
};
