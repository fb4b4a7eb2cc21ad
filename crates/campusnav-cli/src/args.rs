//! Value parsers shared by several subcommands.

use campusnav_lib::Point;
use chrono::NaiveDateTime;

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse `"lat,lng"` into a [`Point`].
pub fn parse_point(value: &str) -> Result<Point, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected 'latitude,longitude', got '{value}'"))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let longitude: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude {latitude} is outside -90..=90"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("longitude {longitude} is outside -180..=180"));
    }
    Ok(Point::new(latitude, longitude))
}

/// Parse a local date-time such as `2025-03-03T10:00`.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime, String> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .ok_or_else(|| format!("expected a date-time like 2025-03-03T10:00, got '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points_with_spaces() {
        assert_eq!(
            parse_point("45.4973, -73.5789").unwrap(),
            Point::new(45.4973, -73.5789)
        );
    }

    #[test]
    fn rejects_out_of_range_points() {
        assert!(parse_point("95,0").is_err());
        assert!(parse_point("0,-181").is_err());
        assert!(parse_point("45.4973").is_err());
    }

    #[test]
    fn parses_both_date_time_separators() {
        assert_eq!(
            parse_date_time("2025-03-03T10:00").unwrap(),
            parse_date_time("2025-03-03 10:00").unwrap()
        );
        assert!(parse_date_time("10:00").is_err());
    }
}
