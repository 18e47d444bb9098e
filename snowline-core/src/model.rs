use std::ops::RangeInclusive;

use anyhow::{Result, anyhow};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{error::FetchError, snowline::snowline_series};

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate from user input, rejecting out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(anyhow!("Latitude {latitude} is outside [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(anyhow!("Longitude {longitude} is outside [-180, 180]"));
        }
        Ok(Self { latitude, longitude })
    }

    /// Display name for the point. There is no reverse geocoding.
    pub fn place_label(&self) -> String {
        format!("Lat {:.2}, Lon {:.2}", self.latitude, self.longitude)
    }
}

/// Hourly forecast for one location, plus the derived snowline.
///
/// All per-hour vectors have the same length as `timestamps`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    coordinate: Coordinate,
    place_label: String,
    grid_elevation: f64,
    timestamps: Vec<DateTime<FixedOffset>>,
    temperature: Vec<Option<f64>>,
    cloud_cover: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    snowline: Vec<Option<f64>>,
}

impl ForecastSeries {
    /// Assemble a series and derive its snowline.
    ///
    /// Fails when the series is empty, the timestamps are not strictly
    /// increasing, or the hourly vectors disagree in length.
    pub fn new(
        coordinate: Coordinate,
        timestamps: Vec<DateTime<FixedOffset>>,
        temperature: Vec<Option<f64>>,
        cloud_cover: Vec<Option<f64>>,
        precipitation: Vec<Option<f64>>,
        grid_elevation: f64,
    ) -> Result<Self, FetchError> {
        let hours = timestamps.len();
        if hours == 0 {
            return Err(FetchError::malformed("forecast contains no hours"));
        }

        if let Some(pair) = timestamps.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(FetchError::malformed(format!(
                "timestamps not strictly increasing at {}",
                pair[1]
            )));
        }

        for (name, len) in [
            ("temperature", temperature.len()),
            ("cloud cover", cloud_cover.len()),
            ("precipitation", precipitation.len()),
        ] {
            if len != hours {
                return Err(FetchError::malformed(format!(
                    "{name} has {len} values for {hours} timestamps"
                )));
            }
        }

        let snowline = snowline_series(&temperature, grid_elevation);

        Ok(Self {
            coordinate,
            place_label: coordinate.place_label(),
            grid_elevation,
            timestamps,
            temperature,
            cloud_cover,
            precipitation,
            snowline,
        })
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn place_label(&self) -> &str {
        &self.place_label
    }

    pub fn grid_elevation(&self) -> f64 {
        self.grid_elevation
    }

    pub fn timestamps(&self) -> &[DateTime<FixedOffset>] {
        &self.timestamps
    }

    pub fn temperature(&self) -> &[Option<f64>] {
        &self.temperature
    }

    pub fn cloud_cover(&self) -> &[Option<f64>] {
        &self.cloud_cover
    }

    pub fn precipitation(&self) -> &[Option<f64>] {
        &self.precipitation
    }

    pub fn snowline(&self) -> &[Option<f64>] {
        &self.snowline
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Window covering every hour.
    pub fn full_window(&self) -> SelectionWindow {
        SelectionWindow {
            start: 0,
            end: self.len().saturating_sub(1),
        }
    }
}

/// Inclusive hour-index range currently highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionWindow {
    pub start: usize,
    pub end: usize,
}

impl SelectionWindow {
    /// Window over `len` hours, or `None` when there is nothing to select.
    pub fn full(len: usize) -> Option<Self> {
        (len > 0).then(|| Self {
            start: 0,
            end: len - 1,
        })
    }

    /// Clamp arbitrary slider handles into `[0, len - 1]`, swapping them if
    /// they arrive reversed.
    pub fn clamped(start: usize, end: usize, len: usize) -> Option<Self> {
        let last = len.checked_sub(1)?;
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        Some(Self {
            start: lo.min(last),
            end: hi.min(last),
        })
    }

    pub fn hour_count(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn place_label_rounds_to_two_decimals() {
        let c = Coordinate {
            latitude: 46.55769,
            longitude: 7.0,
        };
        assert_eq!(c.place_label(), "Lat 46.56, Lon 7.00");
    }

    #[test]
    fn series_derives_snowline_per_hour() {
        let s = testing::series(
            vec![Some(6.5), None],
            vec![Some(10.0), Some(20.0)],
            vec![Some(0.0), None],
            1000.0,
        );
        assert_eq!(s.len(), 2);
        assert_eq!(s.snowline().len(), 2);
        assert!(s.snowline()[0].is_some());
        assert_eq!(s.snowline()[1], None);
        assert_eq!(s.place_label(), "Lat 46.50, Lon 7.98");
    }

    #[test]
    fn series_rejects_length_mismatch() {
        let err = ForecastSeries::new(
            Coordinate {
                latitude: 0.0,
                longitude: 0.0,
            },
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            0.0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no hours"));

        let good = testing::temperatures(&[1.0, 2.0]);
        let err = ForecastSeries::new(
            good.coordinate(),
            good.timestamps().to_vec(),
            vec![Some(1.0), Some(2.0)],
            vec![Some(1.0)],
            vec![None, None],
            0.0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cloud cover has 1 values for 2 timestamps"));
    }

    #[test]
    fn series_rejects_unordered_timestamps() {
        let good = testing::temperatures(&[1.0, 2.0]);
        let ts = good.timestamps();

        for timestamps in [vec![ts[1], ts[0]], vec![ts[0], ts[0]]] {
            let err = ForecastSeries::new(
                good.coordinate(),
                timestamps,
                vec![Some(1.0), Some(2.0)],
                vec![None, None],
                vec![None, None],
                0.0,
            )
            .unwrap_err();
            assert!(matches!(err, FetchError::Malformed(_)));
            assert!(err.to_string().contains("strictly increasing"));
        }
    }

    #[test]
    fn full_window_spans_all_hours() {
        let s = testing::temperatures(&[1.0, 2.0, 3.0]);
        assert_eq!(s.full_window(), SelectionWindow { start: 0, end: 2 });
        assert_eq!(SelectionWindow::full(0), None);
    }

    #[test]
    fn clamped_orders_and_bounds_handles() {
        let w = SelectionWindow::clamped(30, 4, 10).expect("non-empty");
        assert_eq!(w, SelectionWindow { start: 4, end: 9 });
        assert_eq!(w.hour_count(), 6);
        assert!(w.contains(9));
        assert!(!w.contains(3));
        assert_eq!(SelectionWindow::clamped(0, 1, 0), None);
    }
}
