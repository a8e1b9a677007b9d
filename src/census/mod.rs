//! Census tract resolution from coordinates.

mod fcc;

pub use fcc::{CensusArea, FipsResolver};
