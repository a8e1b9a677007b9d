//! Command-line QCT/DDA checker.
//!
//! Loads the QCT list and DDA boundaries, then geocodes each address and
//! reports whether it falls in a Qualified Census Tract and/or a Difficult
//! Development Area.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use qct_dda::census::FipsResolver;
use qct_dda::geocode::Geocoder;
use qct_dda::reference::ReferenceData;
use qct_dda::{Config, EligibilityResult, Pipeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "qct-check")]
#[command(about = "Check addresses against Qualified Census Tracts and Difficult Development Areas")]
struct Args {
    /// Addresses to check (defaults to the configured list)
    addresses: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV with a `fips` column of Qualified Census Tracts
    #[arg(long)]
    qct_file: Option<PathBuf>,

    /// DDA boundaries (.shp or .geojson)
    #[arg(long)]
    dda_file: Option<PathBuf>,

    /// EPSG code of the DDA file, overriding its declared CRS
    #[arg(long)]
    dda_epsg: Option<u16>,

    /// Region the geocoded display name must mention
    #[arg(long)]
    region: Option<String>,

    /// Result output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Args {
    /// Layer command-line overrides over the file (or default) configuration
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(path) = self.qct_file {
            config.data.qct_file = path;
        }
        if let Some(path) = self.dda_file {
            config.data.dda_file = path;
        }
        if self.dda_epsg.is_some() {
            config.data.dda_epsg = self.dda_epsg;
        }
        if let Some(region) = self.region {
            config.geocoder.expected_region = region;
        }
        if !self.addresses.is_empty() {
            config.addresses = self.addresses;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let format = args.format;

    // Initialize logging; JSON output keeps stdout for results only
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder().with_env_filter(filter);
    match format {
        OutputFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        OutputFormat::Json => tracing::subscriber::set_global_default(
            builder.with_writer(std::io::stderr).finish(),
        )?,
    }

    let config = args.into_config()?;

    info!("QCT/DDA checker");
    info!("QCT file: {}", config.data.qct_file.display());
    info!("DDA file: {}", config.data.dda_file.display());

    let reference =
        ReferenceData::load(&config.data).context("Failed to load reference data")?;

    let geocoder = Geocoder::new(&config.geocoder)?;
    let resolver = FipsResolver::new(&config.census)?;
    let pipeline = Pipeline::new(geocoder, resolver, reference);

    pipeline
        .run(&config.addresses, |result| print_result(result, format))
        .await;

    Ok(())
}

fn print_result(result: &EligibilityResult, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", result),
        OutputFormat::Json => match serde_json::to_string(result) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("Failed to serialize result for '{}': {}", result.address, e),
        },
    }
}
