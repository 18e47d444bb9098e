//! Render-ready descriptions of the current forecast.
//!
//! Front ends rebuild these from `(series, window)` on every load and every
//! selection change instead of patching what they drew before.

use serde::Serialize;

use crate::{
    aggregate::{Summary, summarize, time_label},
    model::{ForecastSeries, SelectionWindow},
};

/// Place and elevation captions above the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub place: String,
    pub elevation: String,
}

impl HeaderView {
    /// Before the first location is chosen.
    pub fn idle() -> Self {
        Self {
            place: "Click the map to load a forecast".to_string(),
            elevation: String::new(),
        }
    }

    pub fn for_series(series: &ForecastSeries) -> Self {
        Self {
            place: series.place_label().to_string(),
            elevation: format!("Grid elevation: {:.0} m", series.grid_elevation()),
        }
    }

    pub fn failed() -> Self {
        Self {
            place: "Failed to load data".to_string(),
            elevation: "Grid elevation: n/a".to_string(),
        }
    }
}

/// Four hourly lines sharing one time axis, with the selection shaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub labels: Vec<String>,
    pub temperature: Vec<Option<f64>>,
    pub cloud_cover: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub snowline: Vec<Option<f64>>,
    pub highlight: SelectionWindow,
}

pub fn chart_view(series: &ForecastSeries, window: SelectionWindow) -> ChartView {
    ChartView {
        labels: series.timestamps().iter().map(time_label).collect(),
        temperature: series.temperature().to_vec(),
        cloud_cover: series.cloud_cover().to_vec(),
        precipitation: series.precipitation().to_vec(),
        snowline: series.snowline().to_vec(),
        highlight: window,
    }
}

/// Two-handle range slider over hour indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliderView {
    pub min: usize,
    pub max: usize,
    pub start: usize,
    pub end: usize,
    pub start_tooltip: String,
    pub end_tooltip: String,
}

pub fn slider_view(series: &ForecastSeries, window: SelectionWindow) -> SliderView {
    let timestamps = series.timestamps();
    SliderView {
        min: 0,
        max: series.len().saturating_sub(1),
        start: window.start,
        end: window.end,
        start_tooltip: time_label(&timestamps[window.start]),
        end_tooltip: time_label(&timestamps[window.end]),
    }
}

/// Summary text, one statistic per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub lines: Vec<String>,
}

pub fn summary_view(summary: &Summary) -> SummaryView {
    let mut lines = vec![
        format!("Avg temperature: {}", one_decimal(summary.avg_temperature, "°C")),
        format!("Avg cloud cover: {}", one_decimal(summary.avg_cloud_cover, "%")),
        format!("Total precipitation: {:.1} mm", summary.total_precipitation),
    ];

    if let Some(snowline) = summary.avg_snowline {
        lines.push(format!("Avg snowline: {:.0} m", snowline.round()));
    }

    lines.push(format!("Freezing hours: {}", summary.freezing_hours));
    lines.push(format!(
        "Range: {} → {} ({} h)",
        summary.start_label, summary.end_label, summary.hour_count
    ));

    SummaryView { lines }
}

fn one_decimal(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1} {unit}"),
        None => "n/a".to_string(),
    }
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub header: HeaderView,
    pub chart: ChartView,
    pub slider: SliderView,
    pub summary: Summary,
    pub summary_text: SummaryView,
}

pub fn forecast_view(
    series: &ForecastSeries,
    window: SelectionWindow,
    header: HeaderView,
) -> ForecastView {
    let summary = summarize(series, window);
    ForecastView {
        header,
        chart: chart_view(series, window),
        slider: slider_view(series, window),
        summary_text: summary_view(&summary),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing;

    #[test]
    fn chart_covers_all_hours_and_marks_selection() {
        let series = testing::temperatures(&[1.0, 2.0, 3.0]);
        let chart = chart_view(&series, SelectionWindow { start: 1, end: 2 });

        assert_eq!(chart.labels, vec!["Mon 01 00:00", "Mon 01 01:00", "Mon 01 02:00"]);
        assert_eq!(chart.temperature.len(), 3);
        assert_eq!(chart.snowline, series.snowline());
        assert_eq!(chart.highlight, SelectionWindow { start: 1, end: 2 });
    }

    #[test]
    fn slider_bounds_follow_series() {
        let series = testing::temperatures(&[0.0; 5]);
        let slider = slider_view(&series, SelectionWindow { start: 1, end: 3 });

        assert_eq!((slider.min, slider.max), (0, 4));
        assert_eq!((slider.start, slider.end), (1, 3));
        assert_eq!(slider.start_tooltip, "Mon 01 01:00");
        assert_eq!(slider.end_tooltip, "Mon 01 03:00");
    }

    #[test]
    fn summary_lines_are_formatted() {
        let summary = Summary {
            avg_temperature: Some(2.345),
            avg_cloud_cover: Some(61.04),
            total_precipitation: 3.5,
            avg_snowline: Some(1699.6),
            freezing_hours: 1,
            hour_count: 3,
            start_label: "Mon 01 00:00".into(),
            end_label: "Mon 01 02:00".into(),
        };

        assert_eq!(
            summary_view(&summary).lines,
            vec![
                "Avg temperature: 2.3 °C",
                "Avg cloud cover: 61.0 %",
                "Total precipitation: 3.5 mm",
                "Avg snowline: 1700 m",
                "Freezing hours: 1",
                "Range: Mon 01 00:00 → Mon 01 02:00 (3 h)",
            ]
        );
    }

    #[test]
    fn snowline_line_omitted_without_samples() {
        let series = testing::series(vec![None], vec![Some(10.0)], vec![Some(0.0)], 0.0);
        let text = summary_view(&summarize(&series, series.full_window()));

        assert!(text.lines.iter().all(|l| !l.starts_with("Avg snowline")));
        assert!(text.lines.contains(&"Avg temperature: n/a".to_string()));
    }

    #[test]
    fn header_variants() {
        let series = testing::temperatures(&[1.0]);
        let header = HeaderView::for_series(&series);
        assert_eq!(header.place, "Lat 46.50, Lon 7.98");
        assert_eq!(header.elevation, "Grid elevation: 1000 m");
        assert_eq!(HeaderView::failed().place, "Failed to load data");
    }

    #[test]
    fn forecast_view_bundles_consistent_parts() {
        let series = testing::temperatures(&[2.0, -1.0, 5.0]);
        let view = forecast_view(
            &series,
            series.full_window(),
            HeaderView::for_series(&series),
        );

        assert_eq!(view.summary.freezing_hours, 1);
        assert_eq!(view.slider.max, 2);
        assert_eq!(view.chart.highlight, series.full_window());
        assert_eq!(
            view.summary_text.lines.last().map(String::as_str),
            Some("Range: Mon 01 00:00 → Mon 01 02:00 (3 h)")
        );
    }
}
