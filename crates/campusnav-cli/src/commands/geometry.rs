//! Distance, centroid and label-policy command handlers.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use campusnav_lib::geometry::EARTH_RADIUS_M;
use campusnav_lib::{
    centroid, geojson_ring_centroid, great_circle_distance_meters, label_style, point_in_polygon,
    polygon_from_geojson, Point,
};

use crate::output::{print_json, OutputFormat};

/// Arguments for the distance command.
#[derive(Debug, Clone)]
pub struct DistanceArgs {
    pub from: Point,
    pub to: Point,
}

/// Arguments for the centroid command.
#[derive(Debug, Clone)]
pub struct CentroidArgs {
    /// Ring vertices given on the command line.
    pub points: Vec<Point>,
    /// GeoJSON `Polygon` geometry to read instead of `points`.
    pub geojson: Option<PathBuf>,
    /// Optional point to test against the ring.
    pub contains: Option<Point>,
}

#[derive(Debug, Deserialize)]
struct PolygonGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<Vec<[f64; 2]>>,
}

pub fn handle_distance(args: &DistanceArgs, format: OutputFormat) -> Result<()> {
    let meters = great_circle_distance_meters(args.from, args.to);

    if format.is_json() {
        #[derive(Serialize)]
        struct DistanceOutput {
            from: Point,
            to: Point,
            meters: f64,
            earth_radius_m: f64,
        }
        return print_json(&DistanceOutput {
            from: args.from,
            to: args.to,
            meters,
            earth_radius_m: EARTH_RADIUS_M,
        });
    }

    println!("{meters:.1} m");
    Ok(())
}

pub fn handle_centroid(args: &CentroidArgs, format: OutputFormat) -> Result<()> {
    let (anchor, ring) = match &args.geojson {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let geometry: PolygonGeometry = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse GeoJSON from {}", path.display()))?;
            if geometry.kind != "Polygon" {
                bail!("expected a GeoJSON Polygon geometry, found {}", geometry.kind);
            }
            let anchor = geojson_ring_centroid(&geometry.coordinates)?;
            let ring = geometry
                .coordinates
                .first()
                .map(|outer| polygon_from_geojson(outer))
                .unwrap_or_default();
            (anchor, ring)
        }
        None => (centroid(&args.points)?, args.points.clone()),
    };
    let inside = args.contains.map(|point| point_in_polygon(point, &ring));

    if format.is_json() {
        #[derive(Serialize)]
        struct CentroidOutput {
            centroid: Point,
            vertices: usize,
            #[serde(skip_serializing_if = "Option::is_none")]
            contains: Option<bool>,
        }
        return print_json(&CentroidOutput {
            centroid: anchor,
            vertices: ring.len(),
            contains: inside,
        });
    }

    println!("{:.5},{:.5}", anchor.latitude, anchor.longitude);
    if let Some(inside) = inside {
        println!("contains: {}", if inside { "yes" } else { "no" });
    }
    Ok(())
}

pub fn handle_labels(longitude_delta: f64, format: OutputFormat) -> Result<()> {
    let style = label_style(longitude_delta);

    if format.is_json() {
        return print_json(&style);
    }

    println!("visible: {}", if style.visible { "yes" } else { "no" });
    println!("font size: {:.2}", style.font_size);
    Ok(())
}
