//! FCC Census Area API client.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::CensusConfig;
use crate::error::LookupError;
use crate::http::{build_client, get_json, with_query};
use crate::models::{FipsCode, GeoPoint};

#[derive(Debug, Deserialize)]
struct AreaResponse {
    #[serde(default)]
    results: Option<Vec<CensusArea>>,
}

/// One census block entry from the area lookup
#[derive(Debug, Clone, Deserialize)]
pub struct CensusArea {
    pub county_fips: String,
    pub block_fips: String,
    #[serde(default)]
    pub county_name: Option<String>,
    #[serde(default)]
    pub state_code: Option<String>,
}

impl CensusArea {
    /// Tract-level FIPS for this block
    pub fn tract_fips(&self) -> Result<FipsCode, LookupError> {
        Ok(FipsCode::from_parts(&self.county_fips, &self.block_fips)?)
    }
}

/// Resolves coordinates to an 11-digit census tract FIPS code
pub struct FipsResolver {
    client: Client,
    endpoint: Url,
    census_year: Option<String>,
}

impl FipsResolver {
    pub fn new(config: &CensusConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).context("Invalid census endpoint")?;
        let client = build_client(None, config.timeout_secs)
            .context("Failed to create census HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            census_year: config.census_year.map(|y| y.to_string()),
        })
    }

    /// Look up the tract containing `point`
    pub async fn resolve(&self, point: GeoPoint) -> Result<FipsCode, LookupError> {
        let lat = point.lat.to_string();
        let lon = point.lon.to_string();

        let mut params = vec![("lat", lat.as_str()), ("lon", lon.as_str())];
        if let Some(ref year) = self.census_year {
            params.push(("censusYear", year.as_str()));
        }
        params.push(("format", "json"));

        let url = with_query(&self.endpoint, &params);
        let response: AreaResponse = match get_json(&self.client, url).await {
            Ok(r) => r,
            Err(e) => {
                warn!("Census area lookup at {} failed: {}", point, e);
                return Err(e);
            }
        };

        let area = match response.results.as_deref().and_then(|r| r.first()) {
            Some(a) => a,
            None => {
                warn!("No FIPS code found for location {}", point);
                return Err(LookupError::NoResults);
            }
        };

        let fips = area.tract_fips().inspect_err(|e| {
            warn!("Unusable census area at {}: {}", point, e);
        })?;

        debug!(
            "Resolved {} to tract {} in county {} ({}, {})",
            point,
            fips.tract(),
            fips.county(),
            area.county_name.as_deref().unwrap_or("unknown county"),
            area.state_code.as_deref().unwrap_or("unknown state")
        );

        Ok(fips)
    }
}
