//! Plain-text stand-ins for the chart, slider and summary widgets.

use snowline_core::{ChartView, ForecastView, SliderView};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const MAX_COLUMNS: usize = 96;

pub fn render(view: &ForecastView) -> String {
    let mut out = format!("{}\n{}\n\n", view.header.place, view.header.elevation);

    out.push_str(&chart(&view.chart));
    out.push_str(&slider(&view.slider));
    out.push('\n');

    for line in &view.summary_text.lines {
        out.push_str(line);
        out.push('\n');
    }

    out
}

fn chart(chart: &ChartView) -> String {
    let rows: [(&str, &[Option<f64>]); 4] = [
        ("temp °C ", &chart.temperature),
        ("cloud % ", &chart.cloud_cover),
        ("precip  ", &chart.precipitation),
        ("snow m  ", &chart.snowline),
    ];

    let mut out: String = rows
        .iter()
        .map(|(name, values)| format!("{name}{}\n", sparkline(&bucket(values, MAX_COLUMNS))))
        .collect();

    let hours = chart.labels.len();
    let columns = hours.min(MAX_COLUMNS);
    let marker: String = (0..columns)
        .map(|col| {
            let first_hour = col * hours / columns;
            let last_hour = ((col + 1) * hours / columns)
                .saturating_sub(1)
                .max(first_hour);
            let selected =
                first_hour <= chart.highlight.end && last_hour >= chart.highlight.start;
            if selected { '^' } else { ' ' }
        })
        .collect();
    out.push_str(&format!("        {marker}\n"));

    out
}

fn slider(slider: &SliderView) -> String {
    format!(
        "selected hours {}..={} of {}..={}  [{} → {}]\n",
        slider.start, slider.end, slider.min, slider.max, slider.start_tooltip, slider.end_tooltip
    )
}

/// Average hourly values into at most `columns` buckets, skipping gaps.
fn bucket(values: &[Option<f64>], columns: usize) -> Vec<Option<f64>> {
    let hours = values.len();
    if hours <= columns {
        return values.to_vec();
    }

    (0..columns)
        .map(|col| {
            let slice = &values[col * hours / columns..(col + 1) * hours / columns];
            let present: Vec<f64> = slice
                .iter()
                .flatten()
                .copied()
                .filter(|v| !v.is_nan())
                .collect();
            (!present.is_empty()).then(|| present.iter().sum::<f64>() / present.len() as f64)
        })
        .collect()
}

fn sparkline(values: &[Option<f64>]) -> String {
    let present = values.iter().flatten().copied().filter(|v| !v.is_nan());
    let (lo, hi) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = hi - lo;

    values
        .iter()
        .map(|v| match v {
            Some(v) if !v.is_nan() => {
                let level = if span > 0.0 {
                    ((v - lo) / span * 7.0).round() as usize
                } else {
                    0
                };
                BARS[level.min(7)]
            }
            _ => ' ',
        })
        .collect()
}
