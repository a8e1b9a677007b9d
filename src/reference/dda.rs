//! DDA boundary loading from shapefiles and GeoJSON.

use geo::{Geometry, GeometryCollection, MultiPolygon};
use geojson::GeoJson;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::crs::{epsg_from_crs_name, epsg_from_wkt, to_wgs84};
use super::open_error;
use super::shape::shape_to_multipolygon;
use crate::error::ReferenceError;
use crate::pip::{DdaZone, DdaZones, WGS84_EPSG};

/// Geometries as read from disk, before reprojection
struct RawZones {
    geometries: Vec<MultiPolygon<f64>>,
    epsg: u16,
}

/// Load DDA zones and normalize them to EPSG:4326.
///
/// `epsg_override` replaces whatever CRS the file declares.
pub fn load_dda_zones(
    path: &Path,
    epsg_override: Option<u16>,
) -> Result<DdaZones, ReferenceError> {
    info!("Loading DDA boundaries from {}", path.display());

    if !path.exists() {
        return Err(ReferenceError::Missing {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let raw = match extension.as_deref() {
        Some("shp") => read_shapefile(path)?,
        Some("geojson") | Some("json") => read_geojson(path)?,
        _ => {
            return Err(ReferenceError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    let epsg = match epsg_override {
        Some(code) => {
            if code != raw.epsg {
                info!("Using EPSG:{} in place of declared EPSG:{}", code, raw.epsg);
            }
            code
        }
        None => raw.epsg,
    };

    let geometries = to_wgs84(raw.geometries, epsg)?;
    let zones = geometries.into_iter().map(DdaZone::new).collect();

    Ok(DdaZones::build(zones, epsg))
}

fn read_shapefile(path: &Path) -> Result<RawZones, ReferenceError> {
    let shapes = shapefile::read_shapes(path).map_err(|source| ReferenceError::Shapefile {
        path: path.to_path_buf(),
        source,
    })?;

    let total = shapes.len();
    let geometries: Vec<MultiPolygon<f64>> =
        shapes.iter().filter_map(shape_to_multipolygon).collect();

    if geometries.len() < total {
        debug!(
            "Skipped {} of {} shapefile records without polygon geometry",
            total - geometries.len(),
            total
        );
    }

    let prj = path.with_extension("prj");
    let epsg = if prj.exists() {
        let wkt = fs::read_to_string(&prj).map_err(|source| open_error(&prj, source))?;
        epsg_from_wkt(&wkt)?
    } else {
        warn!(
            "No .prj next to {}; assuming EPSG:{}",
            path.display(),
            WGS84_EPSG
        );
        WGS84_EPSG
    };

    Ok(RawZones { geometries, epsg })
}

fn read_geojson(path: &Path) -> Result<RawZones, ReferenceError> {
    let geojson_error = |message: String| ReferenceError::GeoJson {
        path: path.to_path_buf(),
        message,
    };

    let content = fs::read_to_string(path).map_err(|source| open_error(path, source))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| geojson_error(e.to_string()))?;

    // RFC 7946 drops `crs`; older exports still carry it
    let epsg = match value
        .get("crs")
        .and_then(|crs| crs.get("properties"))
        .and_then(|props| props.get("name"))
        .and_then(|name| name.as_str())
    {
        Some(name) => epsg_from_crs_name(name)?,
        None => WGS84_EPSG,
    };

    let geojson = GeoJson::from_json_value(value).map_err(|e| geojson_error(e.to_string()))?;
    let collection = GeometryCollection::<f64>::try_from(&geojson)
        .map_err(|e| geojson_error(e.to_string()))?;

    let mut geometries = Vec::new();
    for geometry in collection {
        match geometry {
            Geometry::Polygon(p) => geometries.push(MultiPolygon::new(vec![p])),
            Geometry::MultiPolygon(mp) => geometries.push(mp),
            other => debug!("Skipping non-polygon GeoJSON geometry {:?}", other),
        }
    }

    Ok(RawZones { geometries, epsg })
}
