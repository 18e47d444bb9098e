use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{Coordinate, FetchError, ForecastSeries, ForecastSettings};

use super::ForecastProvider;

const HOURLY_FIELDS: &str = "temperature_2m,cloudcover,precipitation";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    base_url: String,
    forecast_days: u8,
    timezone: String,
}

impl OpenMeteoProvider {
    pub fn new(settings: &ForecastSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build HTTP client for Open-Meteo")?;

        Ok(Self::with_client(http, settings))
    }

    /// Use a caller-built HTTP client; `settings.timeout_secs` is not applied.
    pub fn with_client(http: Client, settings: &ForecastSettings) -> Self {
        Self {
            http,
            base_url: settings.base_url.clone(),
            forecast_days: settings.forecast_days,
            timezone: settings.timezone.clone(),
        }
    }

    fn query(&self, coordinate: &Coordinate) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", coordinate.latitude.to_string()),
            ("longitude", coordinate.longitude.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("forecast_days", self.forecast_days.to_string()),
            ("timezone", self.timezone.clone()),
        ]
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn fetch_forecast(&self, coordinate: &Coordinate) -> Result<ForecastSeries, FetchError> {
        debug!(
            url = %self.base_url,
            lat = coordinate.latitude,
            lon = coordinate.longitude,
            "requesting Open-Meteo forecast"
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&self.query(coordinate))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        decode_forecast(&body, *coordinate)
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    elevation: Option<f64>,
    utc_offset_seconds: Option<i32>,
    hourly: Option<OmHourly>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Option<Vec<String>>,
    temperature_2m: Option<Vec<Option<f64>>>,
    cloudcover: Option<Vec<Option<f64>>>,
    precipitation: Option<Vec<Option<f64>>>,
}

/// Turn an Open-Meteo forecast body into a series for `coordinate`.
///
/// `hourly.time` and `hourly.temperature_2m` are required. Missing cloud
/// cover or precipitation arrays become all-absent columns.
pub fn decode_forecast(body: &str, coordinate: Coordinate) -> Result<ForecastSeries, FetchError> {
    let parsed: OmResponse = serde_json::from_str(body)?;

    let hourly = parsed
        .hourly
        .ok_or_else(|| FetchError::malformed("response has no `hourly` block"))?;
    let time = hourly
        .time
        .ok_or_else(|| FetchError::malformed("response has no `hourly.time`"))?;
    let temperature = hourly
        .temperature_2m
        .ok_or_else(|| FetchError::malformed("response has no `hourly.temperature_2m`"))?;

    let offset_secs = parsed.utc_offset_seconds.unwrap_or(0);
    let offset = FixedOffset::east_opt(offset_secs).ok_or_else(|| {
        FetchError::malformed(format!("invalid utc_offset_seconds {offset_secs}"))
    })?;

    let timestamps = time
        .iter()
        .map(|t| parse_local_time(t, offset))
        .collect::<Result<Vec<_>, _>>()?;

    let hours = timestamps.len();
    let cloud_cover = hourly.cloudcover.unwrap_or_else(|| vec![None; hours]);
    let precipitation = hourly.precipitation.unwrap_or_else(|| vec![None; hours]);

    ForecastSeries::new(
        coordinate,
        timestamps,
        temperature,
        cloud_cover,
        precipitation,
        parsed.elevation.unwrap_or(0.0),
    )
}

fn parse_local_time(raw: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>, FetchError> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| FetchError::malformed(format!("bad timestamp {raw:?}: {e}")))?;

    naive
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| FetchError::malformed(format!("ambiguous timestamp {raw:?}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
