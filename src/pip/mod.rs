//! Point-in-polygon tests against Difficult Development Area zones.

mod zone;
mod zones;

pub use zone::DdaZone;
pub use zones::{DdaZones, WGS84_EPSG};
