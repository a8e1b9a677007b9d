//! QCT/DDA - Qualified Census Tract and Difficult Development Area lookups
//!
//! Geocodes street addresses, resolves their census tract, and checks them
//! against the QCT list and DDA boundaries.

pub mod census;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod geocode;
mod http;
pub mod models;
pub mod pip;
pub mod pipeline;
pub mod reference;

pub use config::Config;
pub use error::{FailureKind, LookupError, ReferenceError};
pub use models::{AddressOutcome, EligibilityResult, FipsCode, GeoPoint};
pub use pipeline::{Pipeline, RunSummary};
