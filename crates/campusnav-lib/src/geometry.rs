//! Geographic primitives shared by every other module.
//!
//! All functions here are pure. Coordinates are WGS84 degrees stored as
//! `f64`; distances are metres on a spherical Earth.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius used by the haversine formula, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<(f64, f64)> for Point {
    /// Build a point from a `(latitude, longitude)` tuple.
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Convert degrees to radians.
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Convert radians to degrees.
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Unweighted vertex average of a ring.
///
/// This is the label anchor used for building footprints, not the
/// area-weighted polygon centroid. Closed rings (first vertex repeated at the
/// end) therefore weight that vertex twice.
pub fn centroid(points: &[Point]) -> Result<Point> {
    if points.is_empty() {
        return Err(Error::EmptyCentroidInput);
    }

    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.latitude, lng + p.longitude));
    let count = points.len() as f64;

    Ok(Point::new(lat_sum / count, lng_sum / count))
}

/// Great-circle distance between two points using the haversine formula.
pub fn great_circle_distance_meters(a: Point, b: Point) -> f64 {
    let lat1 = to_radians(a.latitude);
    let lat2 = to_radians(b.latitude);
    let delta_lat = to_radians(b.latitude - a.latitude);
    let delta_lng = to_radians(b.longitude - a.longitude);

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `h` marginally above 1 for antipodal points.
    let c = 2.0 * h.min(1.0).sqrt().atan2((1.0 - h).max(0.0).sqrt());

    EARTH_RADIUS_M * c
}

/// Convert a GeoJSON ring (`[longitude, latitude]` pairs) into points.
pub fn polygon_from_geojson(coordinates: &[[f64; 2]]) -> Vec<Point> {
    coordinates
        .iter()
        .map(|[lng, lat]| Point::new(*lat, *lng))
        .collect()
}

/// Label anchor of a GeoJSON polygon: the vertex average of its outer ring.
///
/// Holes (rings after the first) are ignored.
pub fn geojson_ring_centroid(rings: &[Vec<[f64; 2]>]) -> Result<Point> {
    let outer = rings.first().ok_or(Error::EmptyCentroidInput)?;
    centroid(&polygon_from_geojson(outer))
}

/// Even-odd ray casting test. Points exactly on an edge may fall either way.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let x = point.longitude;
    let y = point.latitude;

    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].longitude, polygon[i].latitude);
        let (xj, yj) = (polygon[j].longitude, polygon[j].latitude);

        let crosses = (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radians_round_trip() {
        assert!((to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((to_degrees(to_radians(42.5)) - 42.5).abs() < 1e-12);
    }

    #[test]
    fn closed_ring_weights_repeated_vertex() {
        let ring = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(3.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        let c = centroid(&ring).expect("non-empty ring");
        assert!((c.latitude - 0.75).abs() < 1e-12);
        assert!((c.longitude - 0.75).abs() < 1e-12);
    }

    #[test]
    fn ray_casting_handles_empty_polygon() {
        assert!(!point_in_polygon(Point::new(0.0, 0.0), &[]));
    }
}
