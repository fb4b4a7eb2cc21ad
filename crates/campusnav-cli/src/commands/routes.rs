//! Directions-response command handler.
//!
//! Reads a provider response from disk (Routes API or legacy Directions API
//! JSON), installs the repackaged routes into a [`NavigationSession`] and
//! prints the selected route.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use campusnav_lib::{
    NavigationSession, ProviderResponse, RequestContext, RouteData, TimeMode, TravelMode,
};

use crate::output::{print_json, render_route_text, OutputFormat};
use crate::terminal::ColorPalette;

/// Arguments for the routes command.
#[derive(Debug, Clone)]
pub struct RoutesArgs {
    pub response: PathBuf,
    pub mode: TravelMode,
    pub time_mode: TimeMode,
    pub target: Option<NaiveDateTime>,
    /// Reference "now" for ETA labels; the local clock when absent.
    pub now: Option<NaiveDateTime>,
    pub select: Option<usize>,
    /// Print every candidate instead of only the selected one.
    pub all: bool,
}

#[derive(Serialize)]
struct RoutesOutput<'a> {
    selected_route_index: usize,
    route_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<&'a RouteData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    routes: Option<&'a [RouteData]>,
}

pub fn handle_routes(args: &RoutesArgs, format: OutputFormat) -> Result<()> {
    let json = fs::read_to_string(&args.response)
        .with_context(|| format!("failed to read {}", args.response.display()))?;
    let response = ProviderResponse::from_json(&json)
        .with_context(|| format!("failed to parse directions response {}", args.response.display()))?;

    let mut session = NavigationSession::new();
    session.set_travel_mode(args.mode);
    session.set_time_mode(args.time_mode);
    session.set_target_time(args.target);

    let context = RequestContext {
        mode: session.travel_mode(),
        time_mode: session.time_mode(),
        target_time: session.target_time(),
        now: args.now.unwrap_or_else(|| Local::now().naive_local()),
    };

    let token = session.begin_request();
    let outcome = response.routes(&context).map_err(|err| err.to_string());
    session.complete_request(token, outcome);
    if let Some(message) = session.error() {
        return Err(anyhow!("{message}"));
    }

    if let Some(index) = args.select {
        session.set_selected_route_index(index);
    }
    let selected = session
        .route_data()
        .ok_or_else(|| anyhow!("no route available"))?;

    if format.is_json() {
        return print_json(&RoutesOutput {
            selected_route_index: session.selected_route_index(),
            route_count: session.routes().len(),
            route: (!args.all).then_some(selected),
            routes: args.all.then_some(session.routes()),
        });
    }

    let palette = ColorPalette::detect();
    if args.all {
        for (index, route) in session.routes().iter().enumerate() {
            let marker = if index == session.selected_route_index() { "*" } else { " " };
            print!("{marker} {}", render_route_text(route, &palette));
        }
    } else {
        print!("{}", render_route_text(selected, &palette));
    }
    Ok(())
}
