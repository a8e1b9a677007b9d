//! Core data models for eligibility checks.

pub mod eligibility;
pub mod fips;
pub mod point;

pub use eligibility::{AddressOutcome, EligibilityResult, LookupStage};
pub use fips::{FipsCode, FIPS_WIDTH};
pub use point::GeoPoint;
