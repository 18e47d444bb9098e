//! Snowline estimation.
//!
//! The freezing level is extrapolated from the surface temperature with a
//! fixed environmental lapse rate, and the snowline sits a fixed distance
//! below it.

/// Temperature decrease per metre of ascent, in °C/m.
pub const LAPSE_RATE: f64 = 0.0065;

/// Distance below the freezing level where snow usually still persists, in metres.
pub const SNOWLINE_OFFSET: f64 = 300.0;

/// Altitude (m) at which the air reaches 0 °C, given the surface temperature
/// at `grid_elevation`.
pub fn freezing_level(temperature: f64, grid_elevation: f64) -> f64 {
    grid_elevation + temperature / LAPSE_RATE
}

/// Approximate snowline for one hour.
///
/// Returns `None` when the temperature is missing or NaN. The result never
/// drops below sea level.
pub fn estimate_snowline(temperature: Option<f64>, grid_elevation: f64) -> Option<f64> {
    let temperature = temperature.filter(|t| !t.is_nan())?;
    let level = freezing_level(temperature, grid_elevation) - SNOWLINE_OFFSET;
    Some(level.max(0.0))
}

/// Applies [`estimate_snowline`] to every hour independently.
pub fn snowline_series(temperature: &[Option<f64>], grid_elevation: f64) -> Vec<Option<f64>> {
    temperature
        .iter()
        .map(|t| estimate_snowline(*t, grid_elevation))
        .collect()
}
