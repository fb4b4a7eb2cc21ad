//! Output formatting for command results.
//!
//! Every command renders either human-readable text or pretty-printed JSON.

use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use campusnav_lib::{DirectionStep, RouteData};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        self == OutputFormat::Json
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Render a route summary followed by its turn-by-turn steps.
pub fn render_route_text(route: &RouteData, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();

    let shuttle = if route.is_shuttle {
        format!(" {}[shuttle]{}", p.yellow, p.reset)
    } else {
        String::new()
    };
    out.push_str(&format!(
        "{}{}{} ({}){}\n",
        p.white_bold, route.id, p.reset, route.request_mode, shuttle
    ));
    out.push_str(&format!(
        "  {}{}{} | {}{}{} | {}\n",
        p.cyan, route.distance, p.reset, p.green, route.duration, p.reset, route.eta
    ));
    out.push_str(&format!(
        "  {}{} points{}\n",
        p.gray,
        route.polyline_points.len(),
        p.reset
    ));

    for (index, step) in route.steps.iter().enumerate() {
        out.push_str(&render_step(index + 1, step, p));
    }
    out
}

fn render_step(number: usize, step: &DirectionStep, p: &ColorPalette) -> String {
    let mode = step.travel_mode.as_deref().unwrap_or("STEP");
    let tag: String = mode.to_ascii_uppercase().chars().take(4).collect();
    let mut line = format!(
        "  {:>2}. {}{:<4}{} {}",
        number,
        p.tag_for(mode),
        tag,
        p.reset,
        step.instruction
    );

    let measures: Vec<&str> = [step.distance.as_str(), step.duration.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !measures.is_empty() {
        line.push_str(&format!(" {}({}){}", p.gray, measures.join(", "), p.reset));
    }
    line.push('\n');
    line
}
