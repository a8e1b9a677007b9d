//! Geographic point in EPSG:4326 degrees.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseFloatError;

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Parse the decimal-string pair returned by geocoding services
    pub fn parse(lat: &str, lon: &str) -> Result<Self, ParseFloatError> {
        Ok(Self {
            lat: lat.trim().parse()?,
            lon: lon.trim().parse()?,
        })
    }

    /// Planar point with longitude on the x axis
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}
