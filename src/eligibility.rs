//! QCT and DDA determination for a resolved location.

use crate::models::{FipsCode, GeoPoint};
use crate::pip::DdaZones;
use crate::reference::QctSet;

/// The two eligibility flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Eligibility {
    pub is_in_qct: bool,
    pub is_in_dda: bool,
}

/// Test tract membership in the QCT list and point containment in the DDA zones
pub fn evaluate(fips: &FipsCode, point: GeoPoint, qct: &QctSet, dda: &DdaZones) -> Eligibility {
    Eligibility {
        is_in_qct: qct.contains(fips),
        is_in_dda: !dda.is_empty() && dda.contains(&point.to_point()),
    }
}
