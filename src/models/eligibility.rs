//! Per-address determinations.

use serde::Serialize;
use std::fmt;

use super::{FipsCode, GeoPoint};
use crate::error::LookupError;

/// QCT/DDA determination for one address
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityResult {
    pub address: String,
    pub fips: FipsCode,
    pub location: GeoPoint,
    pub is_in_qct: bool,
    pub is_in_dda: bool,
}

impl fmt::Display for EligibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is in a QCT zone: {}, in a DDA zone: {}",
            self.address,
            capitalize(self.is_in_qct),
            capitalize(self.is_in_dda)
        )
    }
}

fn capitalize(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Pipeline stage at which an address was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStage {
    Geocode,
    Fips,
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStage::Geocode => write!(f, "geocode"),
            LookupStage::Fips => write!(f, "FIPS code"),
        }
    }
}

/// Outcome of running one address through the pipeline
#[derive(Debug)]
pub enum AddressOutcome {
    Determined(EligibilityResult),
    Skipped {
        address: String,
        stage: LookupStage,
        error: LookupError,
    },
}

impl AddressOutcome {
    pub fn result(&self) -> Option<&EligibilityResult> {
        match self {
            AddressOutcome::Determined(result) => Some(result),
            AddressOutcome::Skipped { .. } => None,
        }
    }
}
