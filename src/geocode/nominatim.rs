//! Nominatim search client.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use super::filter::{select_candidate, CandidateFilter, RegionFilter};
use crate::config::GeocoderConfig;
use crate::error::LookupError;
use crate::http::{build_client, get_json, with_query};
use crate::models::GeoPoint;

/// One entry of a Nominatim `format=json` search response
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeCandidate {
    pub display_name: String,
    pub class: String,
    pub lat: String,
    pub lon: String,
}

/// The candidate chosen for an address
#[derive(Debug, Clone)]
pub struct Located {
    pub display_name: String,
    pub point: GeoPoint,
}

/// Turns free-text addresses into coordinates
pub struct Geocoder {
    client: Client,
    endpoint: Url,
    region: String,
    filter: Box<dyn CandidateFilter>,
}

impl Geocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).context("Invalid geocoder endpoint")?;
        let client = build_client(Some(&config.user_agent), config.timeout_secs)
            .context("Failed to create geocoder HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            region: config.expected_region.clone(),
            filter: Box::new(RegionFilter::new(
                config.expected_region.clone(),
                config.required_class.clone(),
            )),
        })
    }

    /// Replace the default region/class filter
    pub fn with_filter(mut self, filter: impl CandidateFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Geocode an address, keeping the first candidate the filter accepts
    pub async fn geocode(&self, address: &str) -> Result<Located, LookupError> {
        info!("addr: {}", address);

        let url = with_query(&self.endpoint, &[("q", address), ("format", "json")]);
        let raw: Vec<serde_json::Value> = match get_json(&self.client, url).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Geocoding request for '{}' failed: {}", address, e);
                return Err(e);
            }
        };

        if raw.is_empty() {
            warn!("No results found for '{}'", address);
            return Err(LookupError::NoResults);
        }

        let total = raw.len();
        let candidates = decode_candidates(raw);
        debug!(
            "{} candidates for '{}' ({} incomplete)",
            candidates.len(),
            address,
            total - candidates.len()
        );

        let selected = match select_candidate(&candidates, self.filter.as_ref()) {
            Some(c) => c,
            None => {
                warn!("No matching result found in '{}' for '{}'", self.region, address);
                return Err(LookupError::NoMatch {
                    region: self.region.clone(),
                });
            }
        };

        let point = GeoPoint::parse(&selected.lat, &selected.lon).map_err(|_| {
            LookupError::Coordinate {
                value: format!("{},{}", selected.lat, selected.lon),
            }
        })?;

        info!("Selected Location: {}", selected.display_name);
        info!("Lat: {}, Lon: {}", selected.lat, selected.lon);

        Ok(Located {
            display_name: selected.display_name.clone(),
            point,
        })
    }
}

/// Decode each search result on its own, dropping entries with missing fields
fn decode_candidates(raw: Vec<serde_json::Value>) -> Vec<GeocodeCandidate> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<GeocodeCandidate>(value) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                debug!("Ignoring incomplete geocoding result: {}", e);
                None
            }
        })
        .collect()
}
