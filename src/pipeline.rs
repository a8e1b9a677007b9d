//! Per-address driver: geocode, resolve the tract, evaluate.

use tracing::{info, warn};

use crate::census::FipsResolver;
use crate::eligibility::evaluate;
use crate::geocode::Geocoder;
use crate::models::{AddressOutcome, EligibilityResult, LookupStage};
use crate::reference::ReferenceData;

/// Counts for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub determined: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.determined + self.skipped
    }
}

/// Runs addresses through the lookup services against loaded reference data
pub struct Pipeline {
    geocoder: Geocoder,
    resolver: FipsResolver,
    reference: ReferenceData,
}

impl Pipeline {
    pub fn new(geocoder: Geocoder, resolver: FipsResolver, reference: ReferenceData) -> Self {
        Self {
            geocoder,
            resolver,
            reference,
        }
    }

    /// Check a single address; lookup failures produce a skip, never an error
    pub async fn check(&self, address: &str) -> AddressOutcome {
        let located = match self.geocoder.geocode(address).await {
            Ok(l) => l,
            Err(error) => {
                warn!("Could not geocode address '{}' ({}). Skipping.", address, error);
                return AddressOutcome::Skipped {
                    address: address.to_string(),
                    stage: LookupStage::Geocode,
                    error,
                };
            }
        };

        let fips = match self.resolver.resolve(located.point).await {
            Ok(f) => f,
            Err(error) => {
                warn!(
                    "Could not retrieve FIPS code for '{}' ({}). Skipping.",
                    address, error
                );
                return AddressOutcome::Skipped {
                    address: address.to_string(),
                    stage: LookupStage::Fips,
                    error,
                };
            }
        };

        let eligibility = evaluate(
            &fips,
            located.point,
            &self.reference.qct,
            &self.reference.dda,
        );

        AddressOutcome::Determined(EligibilityResult {
            address: address.to_string(),
            fips,
            location: located.point,
            is_in_qct: eligibility.is_in_qct,
            is_in_dda: eligibility.is_in_dda,
        })
    }

    /// Check addresses one at a time, in order, handing each determination to `sink`
    pub async fn run<I, S, F>(&self, addresses: I, mut sink: F) -> RunSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&EligibilityResult),
    {
        let mut summary = RunSummary::default();

        for address in addresses {
            match self.check(address.as_ref()).await {
                AddressOutcome::Determined(result) => {
                    sink(&result);
                    summary.determined += 1;
                }
                AddressOutcome::Skipped { .. } => summary.skipped += 1,
            }
        }

        info!(
            "Checked {} addresses: {} determined, {} skipped",
            summary.total(),
            summary.determined,
            summary.skipped
        );

        summary
    }
}
