//! Census tract FIPS codes.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Width of a tract-level FIPS code: 5-digit state+county, 6-digit tract.
pub const FIPS_WIDTH: usize = 11;

const COUNTY_FIPS_WIDTH: usize = 5;

/// Tract code slice of a 15-digit block FIPS (state 2, county 3, tract 6, block 4).
const TRACT_RANGE: std::ops::Range<usize> = 5..11;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FipsError {
    #[error("county FIPS '{0}' is not 5 characters")]
    CountyWidth(String),
    #[error("block FIPS '{0}' is too short to contain a tract code")]
    BlockTooShort(String),
    #[error("FIPS '{0}' is not 11 ASCII digits")]
    NotTractCode(String),
}

/// An 11-digit census tract identifier.
///
/// Construction always validates the width; there is no way to hold a
/// padded or truncated value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FipsCode(String);

impl FipsCode {
    /// Validate an already-assembled tract code
    pub fn parse(value: &str) -> Result<Self, FipsError> {
        if value.len() == FIPS_WIDTH && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(FipsError::NotTractCode(value.to_string()))
        }
    }

    /// Build from a county FIPS and the tract portion of a block FIPS.
    ///
    /// The county width is asserted rather than assumed so a service format
    /// change surfaces as an error instead of a silent QCT mismatch.
    pub fn from_parts(county_fips: &str, block_fips: &str) -> Result<Self, FipsError> {
        if county_fips.len() != COUNTY_FIPS_WIDTH {
            return Err(FipsError::CountyWidth(county_fips.to_string()));
        }
        let tract = block_fips
            .get(TRACT_RANGE)
            .ok_or_else(|| FipsError::BlockTooShort(block_fips.to_string()))?;

        Self::parse(&format!("{}{}", county_fips, tract))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// State+county prefix
    pub fn county(&self) -> &str {
        &self.0[..COUNTY_FIPS_WIDTH]
    }

    /// Six-digit tract suffix
    pub fn tract(&self) -> &str {
        &self.0[COUNTY_FIPS_WIDTH..]
    }
}

impl fmt::Display for FipsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FipsCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Left-pad a tract code with zeros to [`FIPS_WIDTH`].
///
/// Values already at or beyond the width are returned unchanged.
pub fn zero_pad(value: &str) -> String {
    format!("{:0>width$}", value, width = FIPS_WIDTH)
}
