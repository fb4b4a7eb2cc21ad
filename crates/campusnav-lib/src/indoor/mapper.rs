//! Affine mapping between geographic points and floor-plan coordinates.
//!
//! A floor's artwork is pinned to the map by its geographic bounding box.
//! Local `x` grows eastward from the south-west corner; local `y` grows
//! southward from the north edge, matching image coordinates.
//!
//! Points outside the bounding box are rejected with
//! [`Error::OutOfBounds`] rather than clamped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{to_radians, Point};

/// Axis spans below this many degrees are treated as degenerate by
/// [`projected_height`].
const MIN_PROJECTED_SPAN_DEG: f64 = 0.00001;

/// Slack allowed on the `[0, 1]` fraction range when mapping local points
/// back, absorbing rounding picked up in [`geo_to_local`].
const FRACTION_TOLERANCE: f64 = 1e-9;

/// Geographic rectangle covered by a floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub north_east: Point,
    pub south_west: Point,
}

impl Bounds {
    pub fn new(north_east: Point, south_west: Point) -> Self {
        Self {
            north_east,
            south_west,
        }
    }

    pub fn latitude_span(&self) -> f64 {
        self.north_east.latitude - self.south_west.latitude
    }

    pub fn longitude_span(&self) -> f64 {
        self.north_east.longitude - self.south_west.longitude
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&point.longitude)
    }

    fn ensure_non_degenerate(&self) -> Result<()> {
        if !(self.latitude_span() > 0.0 && self.longitude_span() > 0.0) {
            return Err(Error::DegenerateBounds {
                message: format!(
                    "north-east {:?} must lie strictly north and east of south-west {:?}",
                    self.north_east, self.south_west
                ),
            });
        }
        Ok(())
    }
}

/// Local coordinate space of a floor's artwork, equivalent to an SVG
/// `viewBox`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalExtent {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl LocalExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        }
    }

    fn ensure_non_degenerate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::DegenerateBounds {
                message: format!(
                    "local extent {}x{} must be positive",
                    self.width, self.height
                ),
            });
        }
        Ok(())
    }
}

impl Default for LocalExtent {
    /// The unit square, used when artwork declares no `viewBox`.
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl FromStr for LocalExtent {
    type Err = Error;

    /// Parse `"min-x min-y width height"`; commas are accepted as separators.
    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidViewBox {
            value: value.to_string(),
        };

        let numbers = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        let &[min_x, min_y, width, height] = numbers.as_slice() else {
            return Err(invalid());
        };
        if !(width > 0.0 && height > 0.0) {
            return Err(invalid());
        }

        Ok(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }
}

impl fmt::Display for LocalExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

/// A position in floor-plan coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

/// Map a geographic point into the floor's local coordinate space.
pub fn geo_to_local(point: Point, bounds: &Bounds, extent: &LocalExtent) -> Result<LocalPoint> {
    bounds.ensure_non_degenerate()?;
    extent.ensure_non_degenerate()?;

    if !bounds.contains(point) {
        return Err(Error::OutOfBounds {
            latitude: point.latitude,
            longitude: point.longitude,
        });
    }

    let east_fraction = (point.longitude - bounds.south_west.longitude) / bounds.longitude_span();
    let south_fraction = (bounds.north_east.latitude - point.latitude) / bounds.latitude_span();

    Ok(LocalPoint {
        x: extent.min_x + east_fraction * extent.width,
        y: extent.min_y + south_fraction * extent.height,
    })
}

/// Inverse of [`geo_to_local`].
///
/// Local points outside the extent are rejected with
/// [`Error::OutOfBounds`] carrying the geographic position they would map to.
pub fn local_to_geo(local: LocalPoint, bounds: &Bounds, extent: &LocalExtent) -> Result<Point> {
    bounds.ensure_non_degenerate()?;
    extent.ensure_non_degenerate()?;

    let east_fraction = (local.x - extent.min_x) / extent.width;
    let south_fraction = (local.y - extent.min_y) / extent.height;

    match (snap_fraction(east_fraction), snap_fraction(south_fraction)) {
        (Some(east), Some(south)) => Ok(Point::new(
            bounds.north_east.latitude - south * bounds.latitude_span(),
            bounds.south_west.longitude + east * bounds.longitude_span(),
        )),
        _ => Err(Error::OutOfBounds {
            latitude: bounds.north_east.latitude - south_fraction * bounds.latitude_span(),
            longitude: bounds.south_west.longitude + east_fraction * bounds.longitude_span(),
        }),
    }
}

/// Clamp a fraction into `[0, 1]` when it is within tolerance of the range.
fn snap_fraction(fraction: f64) -> Option<f64> {
    if (-FRACTION_TOLERANCE..=1.0 + FRACTION_TOLERANCE).contains(&fraction) {
        Some(fraction.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// On-screen height for a floor plan drawn `screen_width` wide.
///
/// Uses the geographic aspect ratio of `bounds` with longitude scaled by
/// `cos(latitude)`. Returns `fallback` for missing or near-zero bounds.
pub fn projected_height(bounds: Option<&Bounds>, screen_width: f64, fallback: f64) -> f64 {
    let Some(bounds) = bounds else {
        return fallback;
    };

    let lat_diff = bounds.latitude_span().abs();
    let lng_diff = bounds.longitude_span().abs();
    if lat_diff < MIN_PROJECTED_SPAN_DEG || lng_diff < MIN_PROJECTED_SPAN_DEG {
        return fallback;
    }

    let lng_scale = to_radians(bounds.north_east.latitude).cos();
    let geographic_ratio = (lng_diff * lng_scale) / lat_diff;
    let height = screen_width / geographic_ratio;

    if height.is_finite() {
        height
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall_bounds() -> Bounds {
        Bounds::new(Point::new(45.49769, -73.5783), Point::new(45.49682, -73.57954))
    }

    #[test]
    fn corners_map_to_extent_corners() {
        let bounds = hall_bounds();
        let extent = LocalExtent::new(1024.0, 1024.0);

        let nw = geo_to_local(Point::new(45.49769, -73.57954), &bounds, &extent).unwrap();
        assert!(nw.x.abs() < 1e-6 && nw.y.abs() < 1e-6);

        let se = geo_to_local(Point::new(45.49682, -73.5783), &bounds, &extent).unwrap();
        assert!((se.x - 1024.0).abs() < 1e-6 && (se.y - 1024.0).abs() < 1e-6);
    }

    #[test]
    fn corners_round_trip_under_fractional_view_box() {
        let bounds = hall_bounds();
        let extent: LocalExtent = "0.1 0.1 0.2 0.2".parse().unwrap();
        let corners = [
            bounds.north_east,
            bounds.south_west,
            Point::new(bounds.north_east.latitude, bounds.south_west.longitude),
            Point::new(bounds.south_west.latitude, bounds.north_east.longitude),
        ];

        for corner in corners {
            let local = geo_to_local(corner, &bounds, &extent).unwrap();
            let back = local_to_geo(local, &bounds, &extent)
                .unwrap_or_else(|err| panic!("corner {corner:?} rejected: {err}"));
            assert!((back.latitude - corner.latitude).abs() < 1e-9);
            assert!((back.longitude - corner.longitude).abs() < 1e-9);
        }
    }

    #[test]
    fn local_points_clearly_outside_extent_are_rejected() {
        let bounds = hall_bounds();
        let extent: LocalExtent = "0.1 0.1 0.2 0.2".parse().unwrap();
        let result = local_to_geo(LocalPoint { x: 0.1, y: 0.31 }, &bounds, &extent);
        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn parses_view_box_with_offset() {
        let extent: LocalExtent = "10, 20 300 400".parse().unwrap();
        assert_eq!(extent.min_x, 10.0);
        assert_eq!(extent.min_y, 20.0);
        assert_eq!(extent.width, 300.0);
        assert_eq!(extent.height, 400.0);
    }

    #[test]
    fn rejects_short_view_box() {
        assert!("0 0 1024".parse::<LocalExtent>().is_err());
        assert!("0 0 0 10".parse::<LocalExtent>().is_err());
    }

    #[test]
    fn projected_height_falls_back_for_degenerate_bounds() {
        let flat = Bounds::new(Point::new(45.0, -73.0), Point::new(45.0, -73.1));
        assert_eq!(projected_height(Some(&flat), 400.0, 800.0), 800.0);
        assert_eq!(projected_height(None, 400.0, 800.0), 800.0);
    }
}
