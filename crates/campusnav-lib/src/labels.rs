//! Zoom-dependent visibility and sizing of building labels.
//!
//! Both functions take the map viewport's longitude delta (degrees spanned
//! horizontally); smaller deltas mean the map is zoomed further in.

use serde::Serialize;

/// Labels are drawn only when the viewport spans at most this many degrees.
pub const LABEL_VISIBILITY_MAX_DELTA: f64 = 0.0075;

/// Largest font size a label can reach.
pub const LABEL_FONT_SIZE_CEILING: f64 = 22.0;

const FONT_SIZE_BASE: f64 = 25.0;
const FONT_SIZE_REFERENCE_DELTA: f64 = 0.004;

/// Whether building labels should be visible at this zoom level.
pub fn is_label_visible(longitude_delta: f64) -> bool {
    longitude_delta <= LABEL_VISIBILITY_MAX_DELTA
}

/// Font size for building labels: `min(22, 25 * 0.004 / delta)`.
///
/// Non-positive and NaN deltas return the ceiling.
pub fn label_font_size(longitude_delta: f64) -> f64 {
    if longitude_delta.is_nan() || longitude_delta <= 0.0 {
        return LABEL_FONT_SIZE_CEILING;
    }
    let size = FONT_SIZE_BASE * (FONT_SIZE_REFERENCE_DELTA / longitude_delta);
    size.min(LABEL_FONT_SIZE_CEILING)
}

/// Combined label decision for a single viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelStyle {
    pub visible: bool,
    pub font_size: f64,
}

pub fn label_style(longitude_delta: f64) -> LabelStyle {
    LabelStyle {
        visible: is_label_visible(longitude_delta),
        font_size: label_font_size(longitude_delta),
    }
}
