//! Polyline encode/decode command handlers.

use anyhow::{Context, Result};
use serde::Serialize;

use campusnav_lib::{decode_polyline, encode_polyline, Point};

use crate::output::{print_json, OutputFormat};

/// Arguments for the decode command.
#[derive(Debug, Clone)]
pub struct DecodeArgs {
    pub encoded: String,
}

/// Arguments for the encode command.
#[derive(Debug, Clone)]
pub struct EncodeArgs {
    pub points: Vec<Point>,
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    encoded: &'a str,
    point_count: usize,
    points: &'a [Point],
}

pub fn handle_decode(args: &DecodeArgs, format: OutputFormat) -> Result<()> {
    let points = decode_polyline(&args.encoded).context("failed to decode polyline")?;

    if format.is_json() {
        return print_json(&DecodedOutput {
            encoded: &args.encoded,
            point_count: points.len(),
            points: &points,
        });
    }

    println!("{} points", points.len());
    for point in &points {
        println!("{:.5},{:.5}", point.latitude, point.longitude);
    }
    Ok(())
}

pub fn handle_encode(args: &EncodeArgs, format: OutputFormat) -> Result<()> {
    let encoded = encode_polyline(&args.points);

    if format.is_json() {
        return print_json(&DecodedOutput {
            encoded: &encoded,
            point_count: args.points.len(),
            points: &args.points,
        });
    }

    println!("{encoded}");
    Ok(())
}
