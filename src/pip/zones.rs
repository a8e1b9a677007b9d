//! The loaded DDA collection.

use geo::Point;
use tracing::info;

use super::DdaZone;

/// EPSG code of the geographic WGS 84 system all zones are held in.
pub const WGS84_EPSG: u16 = 4326;

/// All DDA zones, normalized to EPSG:4326.
///
/// Lookups scan every zone; the envelope check on each zone keeps the exact
/// predicate off distant polygons.
#[derive(Debug, Clone, Default)]
pub struct DdaZones {
    zones: Vec<DdaZone>,
    source_epsg: Option<u16>,
}

impl DdaZones {
    /// Build from zones that are already in EPSG:4326
    pub fn build(zones: Vec<DdaZone>, source_epsg: u16) -> Self {
        info!(
            "Loaded {} DDA zones (source CRS EPSG:{})",
            zones.len(),
            source_epsg
        );
        Self {
            zones,
            source_epsg: Some(source_epsg),
        }
    }

    /// True when the point (x = lon, y = lat) is inside or on the boundary of
    /// any zone.
    ///
    /// Always false for an empty collection.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.lookup(point).is_some()
    }

    /// First zone covering the point
    pub fn lookup(&self, point: &Point<f64>) -> Option<&DdaZone> {
        self.zones.iter().find(|zone| zone.covers(point))
    }

    /// CRS the zones were read in, before reprojection
    pub fn source_epsg(&self) -> Option<u16> {
        self.source_epsg
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
