use crate::{
    Config, Coordinate, FetchError, ForecastSeries, provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Source of hourly forecasts.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, coordinate: &Coordinate) -> Result<ForecastSeries, FetchError>;
}

/// Construct the forecast provider described by the config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let provider = OpenMeteoProvider::new(&config.forecast)?;
    Ok(Box::new(provider))
}
