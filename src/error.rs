//! Error types for lookups and reference data.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::models::fips::FipsError;

/// Coarse classification of a per-address failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Parse,
    NotFound,
}

/// Recoverable failure of a single remote lookup.
///
/// Returned by the geocoder and the FIPS resolver; the pipeline logs it and
/// moves on to the next address.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service responded with status {0}")]
    Status(StatusCode),

    #[error("empty response body")]
    EmptyResponse,

    #[error("invalid response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid coordinate '{value}'")]
    Coordinate { value: String },

    #[error("no results found")]
    NoResults,

    #[error("no matching result found in the expected region '{region}'")]
    NoMatch { region: String },

    #[error("malformed FIPS code: {0}")]
    MalformedFips(#[from] FipsError),
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LookupError::Network(_) | LookupError::Status(_) => FailureKind::Network,
            LookupError::EmptyResponse
            | LookupError::Parse(_)
            | LookupError::Coordinate { .. }
            | LookupError::MalformedFips(_) => FailureKind::Parse,
            LookupError::NoResults | LookupError::NoMatch { .. } => FailureKind::NotFound,
        }
    }
}

/// Fatal failure while loading the QCT or DDA reference datasets
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("missing file {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("column '{column}' not found in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("failed to read shapefile {}: {source}", path.display())]
    Shapefile {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    #[error("failed to parse GeoJSON {}: {message}", path.display())]
    GeoJson { path: PathBuf, message: String },

    #[error("unsupported vector format for {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("could not identify coordinate reference system: {0}")]
    UnknownCrs(String),

    #[error("reprojection from EPSG:{epsg} failed: {message}")]
    Projection { epsg: u16, message: String },
}
