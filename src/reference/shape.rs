//! Polygon assembly from shapefile records.

use geo::{Area, Coord, Intersects, LineString, MultiPolygon, Point, Polygon};
use shapefile::{PolygonRing, Shape};
use tracing::debug;

/// Convert one shapefile record into a multipolygon.
///
/// Non-polygon records (and null shapes) yield `None`.
pub fn shape_to_multipolygon(shape: &Shape) -> Option<MultiPolygon<f64>> {
    let polygons = match shape {
        Shape::Polygon(p) => rings_to_polygons(p.rings(), |pt| Coord { x: pt.x, y: pt.y }),
        Shape::PolygonM(p) => rings_to_polygons(p.rings(), |pt| Coord { x: pt.x, y: pt.y }),
        Shape::PolygonZ(p) => rings_to_polygons(p.rings(), |pt| Coord { x: pt.x, y: pt.y }),
        other => {
            debug!("Skipping non-polygon shape {:?}", other.shapetype());
            return None;
        }
    };

    if polygons.is_empty() {
        return None;
    }
    Some(MultiPolygon::new(polygons))
}

/// Group rings into polygons.
///
/// Each outer ring becomes a polygon shell. Each inner ring becomes a hole of
/// the smallest shell containing its first vertex, wherever it sits in the
/// record; a hole inside no shell falls back to the shell read before it.
pub fn rings_to_polygons<P, F>(rings: &[PolygonRing<P>], to_coord: F) -> Vec<Polygon<f64>>
where
    F: Fn(&P) -> Coord<f64>,
{
    let mut shells: Vec<Polygon<f64>> = Vec::new();
    let mut holes: Vec<(LineString<f64>, Option<usize>)> = Vec::new();

    for ring in rings {
        let coords: Vec<Coord<f64>> = ring.points().iter().map(&to_coord).collect();
        let Some(line) = close_ring(coords) else {
            continue;
        };

        match ring {
            PolygonRing::Outer(_) => shells.push(Polygon::new(line, Vec::new())),
            PolygonRing::Inner(_) => holes.push((line, shells.len().checked_sub(1))),
        }
    }

    // Holes with no shell at all are kept as shells
    if shells.is_empty() {
        return holes
            .into_iter()
            .map(|(line, _)| Polygon::new(line, Vec::new()))
            .collect();
    }

    let mut interiors: Vec<Vec<LineString<f64>>> = vec![Vec::new(); shells.len()];
    for (line, preceding) in holes {
        let anchor = Point::from(line.0[0]);
        let owner = shells
            .iter()
            .enumerate()
            .filter(|(_, shell)| shell.intersects(&anchor))
            .min_by(|(_, a), (_, b)| a.unsigned_area().total_cmp(&b.unsigned_area()))
            .map(|(i, _)| i)
            .or(preceding)
            .unwrap_or(0);
        interiors[owner].push(line);
    }

    shells
        .into_iter()
        .zip(interiors)
        .map(|(shell, holes)| {
            let (exterior, _) = shell.into_inner();
            Polygon::new(exterior, holes)
        })
        .collect()
}

/// Close the ring if needed, dropping degenerate ones
fn close_ring(mut ring: Vec<Coord<f64>>) -> Option<LineString<f64>> {
    if ring.len() < 3 {
        return None;
    }
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    if ring.len() < 4 {
        return None;
    }
    Some(LineString::new(ring))
}
