//! Indoor floor-plan command handlers.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use campusnav_lib::indoor::{
    load_indoor_catalog, projected_height, FloorDescriptor, IndoorCatalog,
};
use campusnav_lib::{LocalPoint, Point};

use crate::output::{print_json, OutputFormat};
use crate::terminal::ColorPalette;

/// Arguments for the locate command.
#[derive(Debug, Clone)]
pub struct LocateArgs {
    pub building: String,
    /// Requested level; the building's default floor when absent.
    pub floor: Option<i32>,
    pub point: Point,
}

/// Arguments for the floors command.
#[derive(Debug, Clone)]
pub struct FloorsArgs {
    /// Restrict the listing to one building.
    pub building: Option<String>,
    /// Screen width used to report the projected plan height.
    pub width: f64,
}

/// Fallback plan height when a floor's bounds are degenerate.
const FALLBACK_PLAN_HEIGHT: f64 = 800.0;

fn load_catalog(config: Option<&Path>) -> Result<IndoorCatalog> {
    load_indoor_catalog(config).context("failed to load indoor floor configuration")
}

pub fn handle_locate(
    config: Option<&Path>,
    args: &LocateArgs,
    format: OutputFormat,
) -> Result<()> {
    let catalog = load_catalog(config)?;
    let building = catalog.get(&args.building)?;
    let floor = match args.floor {
        Some(level) => building.select_floor(level)?,
        None => building.default_floor_descriptor()?,
    };
    let local = floor
        .to_local(args.point)
        .with_context(|| format!("cannot place point on floor {} of {}", floor.id, building.id))?;

    if format.is_json() {
        #[derive(Serialize)]
        struct LocateOutput<'a> {
            building: &'a str,
            floor: &'a str,
            level: i32,
            requested_level: Option<i32>,
            point: Point,
            local: LocalPoint,
            view_box: String,
        }
        return print_json(&LocateOutput {
            building: &building.id,
            floor: &floor.id,
            level: floor.level,
            requested_level: args.floor,
            point: args.point,
            local,
            view_box: floor.extent()?.to_string(),
        });
    }

    println!(
        "{} floor {} (level {}): x={:.2} y={:.2}",
        building.id, floor.label, floor.level, local.x, local.y
    );
    Ok(())
}

#[derive(Serialize)]
struct FloorSummary<'a> {
    building: &'a str,
    id: &'a str,
    level: i32,
    label: &'a str,
    is_default: bool,
    view_box: String,
    projected_height: f64,
}

fn summarize<'a>(
    building_id: &'a str,
    default_level: Option<i32>,
    floor: &'a FloorDescriptor,
    width: f64,
) -> Result<FloorSummary<'a>> {
    Ok(FloorSummary {
        building: building_id,
        id: &floor.id,
        level: floor.level,
        label: &floor.label,
        is_default: default_level == Some(floor.level),
        view_box: floor.extent()?.to_string(),
        projected_height: projected_height(Some(&floor.bounds), width, FALLBACK_PLAN_HEIGHT),
    })
}

pub fn handle_floors(
    config: Option<&Path>,
    args: &FloorsArgs,
    format: OutputFormat,
) -> Result<()> {
    let catalog = load_catalog(config)?;
    let buildings = match &args.building {
        Some(id) => vec![catalog.get(id)?],
        None => catalog.buildings().collect(),
    };

    let mut summaries = Vec::new();
    for building in &buildings {
        let default_level = building.default_floor_descriptor().ok().map(|f| f.level);
        for floor in &building.floors {
            summaries.push(summarize(&building.id, default_level, floor, args.width)?);
        }
    }

    if format.is_json() {
        return print_json(&summaries);
    }

    let p = ColorPalette::detect();
    for building in &buildings {
        println!("{}{}{} {}", p.white_bold, building.id, p.reset, building.name);
        for summary in summaries.iter().filter(|s| s.building == building.id) {
            let marker = if summary.is_default { "*" } else { " " };
            println!(
                "  {marker} {:<4} level {:>3}  viewBox {}  {}height {:.0}{}",
                summary.label,
                summary.level,
                summary.view_box,
                p.gray,
                summary.projected_height,
                p.reset
            );
        }
    }
    Ok(())
}
