//! Statistics over the selected hour window.
//!
//! Absent or NaN samples are skipped in every reduction. An average over a
//! window with no valid samples is `None` rather than NaN.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::model::{ForecastSeries, SelectionWindow};

/// Figures shown next to the chart for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub avg_temperature: Option<f64>,
    pub avg_cloud_cover: Option<f64>,
    pub total_precipitation: f64,
    pub avg_snowline: Option<f64>,
    /// Hours at or below 0 °C.
    pub freezing_hours: usize,
    pub hour_count: usize,
    pub start_label: String,
    pub end_label: String,
}

/// Reduce `series` over the inclusive `window`.
///
/// # Panics
///
/// If the window reaches past the end of the series. Windows come from
/// [`ForecastSeries::full_window`] or [`SelectionWindow::clamped`], so this is
/// a caller bug.
pub fn summarize(series: &ForecastSeries, window: SelectionWindow) -> Summary {
    assert!(
        window.start <= window.end && window.end < series.len(),
        "selection {window:?} outside series of {} hours",
        series.len()
    );

    let range = window.range();
    let temperature = &series.temperature()[range.clone()];
    let timestamps = series.timestamps();

    Summary {
        avg_temperature: mean(temperature),
        avg_cloud_cover: mean(&series.cloud_cover()[range.clone()]),
        total_precipitation: present(&series.precipitation()[range.clone()]).sum(),
        avg_snowline: mean(&series.snowline()[range]),
        freezing_hours: present(temperature).filter(|t| *t <= 0.0).count(),
        hour_count: window.hour_count(),
        start_label: time_label(&timestamps[window.start]),
        end_label: time_label(&timestamps[window.end]),
    }
}

/// Weekday, day of month and hour, e.g. `Mon 01 14:00`.
pub fn time_label(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%a %d %H:00").to_string()
}

fn present(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().flatten().copied().filter(|v| !v.is_nan())
}

fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = present(values).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing;

    const EPS: f64 = 1e-9;

    fn window(start: usize, end: usize) -> SelectionWindow {
        SelectionWindow { start, end }
    }

    #[test]
    fn counts_freezing_hours() {
        let series = testing::temperatures(&[2.0, -1.0, 5.0]);
        let summary = summarize(&series, window(0, 2));

        assert_eq!(summary.freezing_hours, 1);
        assert_eq!(summary.hour_count, 3);
    }

    #[test]
    fn zero_degrees_counts_as_freezing() {
        let series = testing::temperatures(&[0.0, 0.1, -0.0, -7.0]);
        let summary = summarize(&series, series.full_window());
        assert_eq!(summary.freezing_hours, 3);
    }

    #[test]
    fn sums_precipitation() {
        let series = testing::series(
            vec![Some(1.0); 4],
            vec![Some(0.0); 4],
            vec![Some(0.0), Some(2.5), Some(0.0), Some(1.0)],
            0.0,
        );
        let summary = summarize(&series, series.full_window());
        assert!((summary.total_precipitation - 3.5).abs() < EPS);
    }

    #[test]
    fn full_window_uses_every_hour_once() {
        let series = testing::series(
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
            vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)],
            vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0)],
            1000.0,
        );
        let summary = summarize(&series, series.full_window());

        assert_eq!(summary.avg_temperature, Some(2.5));
        assert_eq!(summary.avg_cloud_cover, Some(25.0));
        assert!((summary.total_precipitation - 4.0).abs() < EPS);
        assert_eq!(summary.hour_count, 4);

        let expected_snowline = series.snowline().iter().flatten().sum::<f64>() / 4.0;
        let avg_snowline = summary.avg_snowline.expect("all hours have a snowline");
        assert!((avg_snowline - expected_snowline).abs() < EPS);
    }

    #[test]
    fn sub_window_ignores_hours_outside() {
        let series = testing::temperatures(&[-10.0, 4.0, 6.0, -10.0]);
        let summary = summarize(&series, window(1, 2));

        assert_eq!(summary.avg_temperature, Some(5.0));
        assert_eq!(summary.freezing_hours, 0);
        assert_eq!(summary.hour_count, 2);
    }

    #[test]
    fn absent_samples_are_skipped() {
        let series = testing::series(
            vec![Some(4.0), None, Some(f64::NAN), Some(-2.0)],
            vec![None, Some(80.0), None, Some(40.0)],
            vec![None, Some(1.5), None, None],
            500.0,
        );
        let summary = summarize(&series, series.full_window());

        assert_eq!(summary.avg_temperature, Some(1.0));
        assert_eq!(summary.avg_cloud_cover, Some(60.0));
        assert!((summary.total_precipitation - 1.5).abs() < EPS);
        assert_eq!(summary.freezing_hours, 1);

        // snowline exists for 4.0 and -2.0 only
        let expected =
            (series.snowline()[0].expect("present") + series.snowline()[3].expect("present")) / 2.0;
        assert!((summary.avg_snowline.expect("two samples") - expected).abs() < EPS);
    }

    #[test]
    fn no_valid_samples_leaves_averages_empty() {
        let series = testing::series(vec![None, None], vec![None, None], vec![None, None], 800.0);
        let summary = summarize(&series, series.full_window());

        assert_eq!(summary.avg_temperature, None);
        assert_eq!(summary.avg_cloud_cover, None);
        assert_eq!(summary.avg_snowline, None);
        assert_eq!(summary.total_precipitation, 0.0);
        assert_eq!(summary.freezing_hours, 0);
        assert_eq!(summary.hour_count, 2);
    }

    #[test]
    fn labels_name_first_and_last_hour() {
        let series = testing::temperatures(&[1.0; 30]);
        let summary = summarize(&series, window(2, 27));

        assert_eq!(summary.start_label, "Mon 01 02:00");
        assert_eq!(summary.end_label, "Tue 02 03:00");
    }

    #[test]
    #[should_panic(expected = "outside series")]
    fn window_past_end_is_a_bug() {
        let series = testing::temperatures(&[1.0, 2.0]);
        summarize(&series, window(0, 2));
    }
}
