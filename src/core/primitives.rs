use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Wraps an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Point on a circle using the math convention: counterclockwise from
/// 3 o'clock with screen y pointing down.
#[must_use]
pub fn polar_to_pixel(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> (f64, f64) {
    let radians = angle_deg.to_radians();
    (cx + radius * radians.cos(), cy - radius * radians.sin())
}

/// Shortest human-readable rendering of a percentage, `24` rather than `24.0`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value}%")
}
