use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use campusnav_cli::args::{parse_date_time, parse_point};
use campusnav_cli::commands::{geometry, indoor, polyline, routes, shuttle};
use campusnav_cli::output::OutputFormat;
use campusnav_lib::{Point, TimeMode, TravelMode};

#[derive(Parser, Debug)]
#[command(author, version, about = "Campus navigation engine utilities")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Indoor floor configuration file (overrides CAMPUSNAV_INDOOR_CONFIG).
    #[arg(long, global = true)]
    indoor_config: Option<PathBuf>,

    /// Shuttle timetable file (overrides CAMPUSNAV_SHUTTLE_SCHEDULE).
    #[arg(long, global = true)]
    shuttle_schedule: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode an encoded polyline into points.
    Decode {
        /// Encoded polyline string.
        encoded: String,
    },
    /// Encode points into a polyline.
    Encode {
        /// Points as `lat,lng`.
        #[arg(required = true, value_parser = parse_point, allow_hyphen_values = true)]
        points: Vec<Point>,
    },
    /// Great-circle distance between two points in metres.
    Distance {
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Point,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Point,
    },
    /// Label anchor of a ring of points or a GeoJSON polygon.
    Centroid {
        /// Ring vertices as `lat,lng`.
        #[arg(value_parser = parse_point, allow_hyphen_values = true, required_unless_present = "geojson")]
        points: Vec<Point>,
        /// GeoJSON Polygon geometry file.
        #[arg(long, conflicts_with = "points")]
        geojson: Option<PathBuf>,
        /// Also report whether this point lies inside the ring.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        contains: Option<Point>,
    },
    /// Building label visibility and font size for a viewport longitude delta.
    Labels {
        #[arg(long)]
        delta: f64,
    },
    /// Map a geographic point onto a building floor plan.
    Locate {
        /// Building id (e.g. H, MB, VL).
        #[arg(long)]
        building: String,
        /// Floor level; nearest level is used when there is no exact match.
        #[arg(long, allow_hyphen_values = true)]
        floor: Option<i32>,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        point: Point,
    },
    /// List configured buildings and floors.
    Floors {
        #[arg(long)]
        building: Option<String>,
        /// Screen width for the projected plan height.
        #[arg(long, default_value_t = 400.0)]
        width: f64,
    },
    /// Repackage a directions-provider response and show the selected route.
    Routes {
        /// Provider response JSON file (Routes API or legacy Directions API).
        response: PathBuf,
        #[arg(long, default_value = "walking")]
        mode: TravelMode,
        #[arg(long = "time-mode", default_value = "leave")]
        time_mode: TimeMode,
        /// Target departure/arrival time, e.g. 2025-03-03T10:00.
        #[arg(long, value_parser = parse_date_time)]
        target: Option<NaiveDateTime>,
        /// Reference time for ETA labels (defaults to the local clock).
        #[arg(long, value_parser = parse_date_time)]
        now: Option<NaiveDateTime>,
        /// Route index to select.
        #[arg(long)]
        select: Option<usize>,
        /// Print every candidate route.
        #[arg(long)]
        all: bool,
    },
    /// Plan a Concordia shuttle trip between the two campuses.
    Shuttle {
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Point,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Point,
        /// Departure (or arrival with --time-mode arrive) time.
        #[arg(long, value_parser = parse_date_time)]
        at: Option<NaiveDateTime>,
        #[arg(long = "time-mode", default_value = "leave")]
        time_mode: TimeMode,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let format = cli.format;

    match cli.command {
        Command::Decode { encoded } => {
            polyline::handle_decode(&polyline::DecodeArgs { encoded }, format)
        }
        Command::Encode { points } => {
            polyline::handle_encode(&polyline::EncodeArgs { points }, format)
        }
        Command::Distance { from, to } => {
            geometry::handle_distance(&geometry::DistanceArgs { from, to }, format)
        }
        Command::Centroid {
            points,
            geojson,
            contains,
        } => geometry::handle_centroid(
            &geometry::CentroidArgs {
                points,
                geojson,
                contains,
            },
            format,
        ),
        Command::Labels { delta } => geometry::handle_labels(delta, format),
        Command::Locate {
            building,
            floor,
            point,
        } => indoor::handle_locate(
            cli.indoor_config.as_deref(),
            &indoor::LocateArgs {
                building,
                floor,
                point,
            },
            format,
        ),
        Command::Floors { building, width } => indoor::handle_floors(
            cli.indoor_config.as_deref(),
            &indoor::FloorsArgs { building, width },
            format,
        ),
        Command::Routes {
            response,
            mode,
            time_mode,
            target,
            now,
            select,
            all,
        } => routes::handle_routes(
            &routes::RoutesArgs {
                response,
                mode,
                time_mode,
                target,
                now,
                select,
                all,
            },
            format,
        ),
        Command::Shuttle {
            from,
            to,
            at,
            time_mode,
        } => shuttle::handle_shuttle(
            cli.shuttle_schedule.as_deref(),
            &shuttle::ShuttleArgs {
                from,
                to,
                at,
                time_mode,
            },
            format,
        ),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
