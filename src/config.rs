use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub const NOMINATIM_SEARCH_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const FCC_AREA_ENDPOINT: &str = "https://geo.fcc.gov/api/census/area";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub geocoder: GeocoderConfig,
    pub census: CensusConfig,
    pub addresses: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub qct_file: PathBuf,
    pub dda_file: PathBuf,
    /// Overrides whatever CRS the DDA file declares
    pub dda_epsg: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub expected_region: String,
    pub required_class: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CensusConfig {
    pub endpoint: String,
    pub census_year: Option<u16>,
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            geocoder: GeocoderConfig::default(),
            census: CensusConfig::default(),
            addresses: vec![
                "5455 Wilshire Blvd".to_string(),
                "5425 Wilshire Blvd".to_string(),
                "2331 Portland St".to_string(),
            ],
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            qct_file: PathBuf::from("data/QCT2025.csv"),
            dda_file: PathBuf::from("data/DDA/DDA2024.shp"),
            dda_epsg: None,
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_SEARCH_ENDPOINT.to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            expected_region: "California".to_string(),
            required_class: "place".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            endpoint: FCC_AREA_ENDPOINT.to_string(),
            census_year: None,
            timeout_secs: None,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both service endpoints are absolute URLs
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.geocoder.endpoint).context("Invalid geocoder endpoint")?;
        Url::parse(&self.census.endpoint).context("Invalid census endpoint")?;
        Ok(())
    }
}
