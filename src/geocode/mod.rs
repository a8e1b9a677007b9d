//! Address geocoding against a Nominatim-compatible search endpoint.

mod filter;
mod nominatim;

pub use filter::{select_candidate, CandidateFilter, RegionFilter};
pub use nominatim::{GeocodeCandidate, Geocoder, Located};
