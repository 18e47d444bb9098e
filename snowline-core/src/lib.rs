//! Core library for the `snowline` forecast viewer.
//!
//! This crate defines:
//! - Configuration handling
//! - Abstraction over forecast providers (Open-Meteo out of the box)
//! - Snowline estimation from surface temperature and grid elevation
//! - A single-slot forecast session with a drop-not-queue load guard
//! - Range statistics and render-ready view descriptions
//!
//! It is used by `snowline-cli`, but any front end that can turn a map click
//! into a [`Coordinate`] and a slider drag into an index window can drive it.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod session;
pub mod snowline;
pub mod view;

pub use aggregate::{Summary, summarize};
pub use config::{Config, ForecastSettings};
pub use error::FetchError;
pub use model::{Coordinate, ForecastSeries, SelectionWindow};
pub use provider::{ForecastProvider, provider_from_config};
pub use session::{ForecastSession, LoadOutcome, SeriesStore};
pub use snowline::{LAPSE_RATE, SNOWLINE_OFFSET, estimate_snowline};
pub use view::{ChartView, ForecastView, HeaderView, SliderView, SummaryView};
