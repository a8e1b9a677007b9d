//! Candidate selection for geocoder results.

use super::GeocodeCandidate;

/// Decides whether a geocoder candidate is acceptable
pub trait CandidateFilter: Send + Sync {
    fn accepts(&self, candidate: &GeocodeCandidate) -> bool;
}

impl<F> CandidateFilter for F
where
    F: Fn(&GeocodeCandidate) -> bool + Send + Sync,
{
    fn accepts(&self, candidate: &GeocodeCandidate) -> bool {
        self(candidate)
    }
}

/// Accepts candidates whose display name mentions a region and whose
/// classification matches.
///
/// Plain substring match on the display name: a street named after the
/// region elsewhere will also pass.
#[derive(Debug, Clone)]
pub struct RegionFilter {
    pub region: String,
    pub class: String,
}

impl RegionFilter {
    pub fn new(region: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            class: class.into(),
        }
    }
}

impl CandidateFilter for RegionFilter {
    fn accepts(&self, candidate: &GeocodeCandidate) -> bool {
        candidate.display_name.contains(&self.region) && candidate.class == self.class
    }
}

/// First candidate, in service order, accepted by `filter`
pub fn select_candidate<'a>(
    candidates: &'a [GeocodeCandidate],
    filter: &dyn CandidateFilter,
) -> Option<&'a GeocodeCandidate> {
    candidates.iter().find(|c| filter.accepts(c))
}
