use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::CustomType;
use snowline_core::{
    Config, Coordinate, ForecastSession, LoadOutcome, provider_from_config,
    snowline::{estimate_snowline, freezing_level},
};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "snowline", version, about = "Hourly forecast with estimated snowline")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a default location.
    Configure,

    /// Load the 16-day forecast for a point and summarize an hour range.
    Show {
        /// Latitude in decimal degrees; falls back to the configured default.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// First hour index of the selection (default: 0).
        #[arg(long)]
        from: Option<usize>,

        /// Last hour index of the selection (default: last hour).
        #[arg(long)]
        to: Option<usize>,

        /// Print the view as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Estimate the snowline for a single temperature reading.
    Estimate {
        /// Surface temperature in °C.
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,

        /// Model grid elevation in metres.
        #[arg(long, allow_negative_numbers = true)]
        elevation: f64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                lat,
                lon,
                from,
                to,
                json,
            } => show(lat.zip(lon), from, to, json).await,
            Command::Estimate {
                temperature,
                elevation,
            } => {
                estimate(temperature, elevation);
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let current = config.default_coordinate().ok().flatten();

    let mut latitude = CustomType::<f64>::new("Default latitude:")
        .with_help_message("Decimal degrees, -90 to 90");
    let mut longitude = CustomType::<f64>::new("Default longitude:")
        .with_help_message("Decimal degrees, -180 to 180");
    if let Some(c) = current {
        latitude = latitude.with_default(c.latitude);
        longitude = longitude.with_default(c.longitude);
    }

    let coordinate = Coordinate::new(latitude.prompt()?, longitude.prompt()?)?;
    config.set_default_location(coordinate);
    config.save()?;

    println!(
        "Saved default location {} to {}",
        coordinate.place_label(),
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(
    point: Option<(f64, f64)>,
    from: Option<usize>,
    to: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;

    let coordinate = match point {
        Some((lat, lon)) => Coordinate::new(lat, lon)?,
        None => config.default_coordinate()?.ok_or_else(|| {
            anyhow!(
                "No location given.\n\
                 Hint: pass --lat and --lon, or run `snowline configure` to store a default."
            )
        })?,
    };

    let provider = provider_from_config(&config)?;
    let session = ForecastSession::new(provider);

    match session.load_at(coordinate).await {
        Ok(LoadOutcome::Loaded { hours }) => debug!(hours, "forecast ready"),
        Ok(LoadOutcome::Ignored) => bail!("A forecast load is already running"),
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Err(err)
                .with_context(|| format!("Loading forecast for {}", coordinate.place_label()));
        }
    }

    if from.is_some() || to.is_some() {
        session.select(from.unwrap_or(0), to.unwrap_or(usize::MAX));
    }

    let view = session.view().context("Forecast loaded but no view available")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render(&view));
    }

    Ok(())
}

fn estimate(temperature: f64, elevation: f64) {
    let level = freezing_level(temperature, elevation);
    match estimate_snowline(Some(temperature), elevation) {
        Some(snowline) => println!("Freezing level: {level:.0} m\nSnowline: {snowline:.0} m"),
        None => println!("Temperature is not a number; no snowline."),
    }
}
