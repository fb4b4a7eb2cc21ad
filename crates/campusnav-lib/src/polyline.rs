//! Encoded polyline codec.
//!
//! Implements the signed-delta, 5-bit-chunk, ASCII-offset-63 encoding used by
//! common directions providers:
//!
//! ```text
//! value  = round(degrees * 1e5) - previous
//! zigzag = value < 0 ? !(value << 1) : value << 1
//! chunks = zigzag split into 5-bit groups, least significant first
//! char   = chunk | 0x20 (if more chunks follow), then + 63
//! ```
//!
//! Each point contributes a latitude delta followed by a longitude delta,
//! both accumulated from `(0, 0)`.
//!
//! Malformed input fails fast with [`Error::MalformedPolyline`]: a string
//! that ends mid-chunk (last byte still carries the continuation bit), a
//! latitude without its longitude, or a byte below the `?` offset.

use tracing::trace;

use crate::error::{Error, Result};
use crate::geometry::Point;

/// Fixed-point scale of the encoding (five decimal places of a degree).
pub const POLYLINE_PRECISION: f64 = 1e5;

const ASCII_OFFSET: u8 = 63;
const CONTINUATION_BIT: i64 = 0x20;
const CHUNK_MASK: i64 = 0x1f;
/// A valid delta never needs more than 32 bits; stop before the shift overflows.
const MAX_SHIFT: u32 = 35;

/// Decode an encoded polyline into points.
///
/// The empty string yields an empty vector.
pub fn decode_polyline(encoded: &str) -> Result<Vec<Point>> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::with_capacity(bytes.len() / 4);
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat += next_delta(bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(Error::MalformedPolyline {
                position: index,
                reason: "latitude without a matching longitude".to_string(),
            });
        }
        lng += next_delta(bytes, &mut index)?;

        points.push(Point::new(
            lat as f64 / POLYLINE_PRECISION,
            lng as f64 / POLYLINE_PRECISION,
        ));
    }

    trace!(points = points.len(), bytes = bytes.len(), "decoded polyline");
    Ok(points)
}

/// Read one zig-zag encoded value starting at `*index`.
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&raw) = bytes.get(*index) else {
            return Err(Error::MalformedPolyline {
                position: *index,
                reason: "input ends in the middle of a chunk".to_string(),
            });
        };
        if raw < ASCII_OFFSET || raw > ASCII_OFFSET + 0x3f {
            return Err(Error::MalformedPolyline {
                position: *index,
                reason: format!("byte 0x{raw:02x} is outside the encoding alphabet"),
            });
        }
        if shift > MAX_SHIFT {
            return Err(Error::MalformedPolyline {
                position: *index,
                reason: "value exceeds 32 bits".to_string(),
            });
        }

        let chunk = i64::from(raw - ASCII_OFFSET);
        *index += 1;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk < CONTINUATION_BIT {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode points into a polyline string.
///
/// Coordinates are rounded to the nearest 1e-5 degree, so
/// `decode_polyline(&encode_polyline(p))` reproduces `p` to that precision.
pub fn encode_polyline(points: &[Point]) -> String {
    let mut encoded = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.latitude * POLYLINE_PRECISION).round() as i64;
        let lng = (point.longitude * POLYLINE_PRECISION).round() as i64;
        push_value(&mut encoded, lat - prev_lat);
        push_value(&mut encoded, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn push_value(out: &mut String, value: i64) {
    let mut zigzag = if value < 0 { !(value << 1) } else { value << 1 };

    while zigzag >= CONTINUATION_BIT {
        let chunk = (CONTINUATION_BIT | (zigzag & CHUNK_MASK)) as u8;
        out.push(char::from(chunk + ASCII_OFFSET));
        zigzag >>= 5;
    }
    out.push(char::from(zigzag as u8 + ASCII_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delta_is_single_question_mark() {
        let mut out = String::new();
        push_value(&mut out, 0);
        assert_eq!(out, "?");
    }

    #[test]
    fn negative_one_encodes_as_at_sign() {
        let mut out = String::new();
        push_value(&mut out, -1);
        assert_eq!(out, "@");
        let mut index = 0;
        assert_eq!(next_delta(out.as_bytes(), &mut index).unwrap(), -1);
    }

    #[test]
    fn rejects_bytes_below_offset() {
        let err = decode_polyline("??!").unwrap_err();
        assert!(matches!(err, Error::MalformedPolyline { position: 2, .. }));
    }
}
