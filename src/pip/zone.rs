//! A single DDA polygon with its envelope.

use geo::{BoundingRect, Intersects, MultiPolygon, Point, Rect};

/// One DDA feature in EPSG:4326
#[derive(Debug, Clone)]
pub struct DdaZone {
    pub geometry: MultiPolygon<f64>,
    bbox: Option<Rect<f64>>,
}

impl DdaZone {
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        let bbox = geometry.bounding_rect();
        Self { geometry, bbox }
    }

    /// Get the bounding box of this zone as (min_x, min_y, max_x, max_y)
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.bbox
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// True when `point` lies inside the zone or on its boundary
    pub fn covers(&self, point: &Point<f64>) -> bool {
        match self.bbox {
            // Rect intersection is inclusive of its edges
            Some(rect) if rect.intersects(point) => self.geometry.intersects(point),
            _ => false,
        }
    }
}
