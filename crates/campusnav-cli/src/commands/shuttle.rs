//! Shuttle planning command handler.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

use campusnav_lib::{load_shuttle_schedule, plan_shuttle_route, Point, ShuttleRequest, TimeMode};

use crate::output::{print_json, render_route_text, OutputFormat};
use crate::terminal::ColorPalette;

/// Arguments for the shuttle command.
#[derive(Debug, Clone)]
pub struct ShuttleArgs {
    pub from: Point,
    pub to: Point,
    /// Departure (or arrival) time; the local clock when absent.
    pub at: Option<NaiveDateTime>,
    pub time_mode: TimeMode,
}

pub fn handle_shuttle(
    schedule_path: Option<&Path>,
    args: &ShuttleArgs,
    format: OutputFormat,
) -> Result<()> {
    let schedule =
        load_shuttle_schedule(schedule_path).context("failed to load shuttle schedule")?;

    let mut request = ShuttleRequest::new(
        args.from,
        args.to,
        args.at.unwrap_or_else(|| Local::now().naive_local()),
    );
    request.time_mode = args.time_mode;

    let planned = plan_shuttle_route(&request, &schedule)?;

    if format.is_json() {
        return print_json(&planned);
    }

    match planned {
        Some(planned) => {
            let p = ColorPalette::detect();
            println!(
                "{}Departs {} at {}{}",
                p.yellow,
                planned.departing,
                planned.departure.format("%H:%M"),
                p.reset
            );
            print!("{}", render_route_text(&planned.route, &p));
        }
        None => println!("No shuttle trip available"),
    }
    Ok(())
}
