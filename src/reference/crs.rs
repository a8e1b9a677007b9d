//! Coordinate reference system detection and reprojection to EPSG:4326.

use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use regex::Regex;
use std::sync::OnceLock;
use tracing::info;

use crate::error::ReferenceError;
use crate::pip::WGS84_EPSG;

/// Root names of common CRS definitions that ship without an EPSG authority
/// (ESRI-style `.prj` files mostly).
const KNOWN_CRS_NAMES: &[(&str, u16)] = &[
    ("GCS_WGS_1984", 4326),
    ("WGS 84", 4326),
    ("WGS_1984", 4326),
    ("GCS_North_American_1983", 4269),
    ("NAD83", 4269),
    ("WGS_1984_Web_Mercator_Auxiliary_Sphere", 3857),
    ("WGS 84 / Pseudo-Mercator", 3857),
    ("NAD_1983_California_Teale_Albers", 3310),
    ("NAD83 / California Albers", 3310),
    ("NAD_1983_Contiguous_USA_Albers", 5070),
    ("NAD83 / Conus Albers", 5070),
];

fn root_authority_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"AUTHORITY\[\s*"EPSG"\s*,\s*"?(\d+)"?\s*\]\s*\]\s*$"#)
            .expect("valid regex")
    })
}

fn root_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(?:PROJCS|GEOGCS|PROJCRS|GEOGCRS|GEODCRS)\[\s*"([^"]+)""#)
            .expect("valid regex")
    })
}

/// EPSG code for a WKT definition (the content of a `.prj` sidecar).
///
/// The root `AUTHORITY` wins; otherwise the root name is matched against a
/// short list of definitions common for U.S. federal datasets.
pub fn epsg_from_wkt(wkt: &str) -> Result<u16, ReferenceError> {
    if let Some(code) = root_authority_regex()
        .captures(wkt)
        .and_then(|c| c[1].parse::<u16>().ok())
    {
        return Ok(code);
    }

    if let Some(name) = root_name_regex().captures(wkt).map(|c| c[1].to_string()) {
        if let Some((_, code)) = KNOWN_CRS_NAMES.iter().find(|(known, _)| *known == name) {
            return Ok(*code);
        }
        return Err(ReferenceError::UnknownCrs(name));
    }

    Err(ReferenceError::UnknownCrs(wkt.chars().take(60).collect()))
}

/// EPSG code from a GeoJSON `crs.properties.name` value.
///
/// Accepts `EPSG:3857`, `urn:ogc:def:crs:EPSG::3857` and the OGC CRS84 URN.
pub fn epsg_from_crs_name(name: &str) -> Result<u16, ReferenceError> {
    if name.ends_with("CRS84") {
        return Ok(WGS84_EPSG);
    }
    name.rsplit(':')
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .filter(|_| name.contains("EPSG"))
        .ok_or_else(|| ReferenceError::UnknownCrs(name.to_string()))
}

/// Reproject geometries from `source_epsg` into EPSG:4326.
///
/// Input already in 4326 is returned untouched.
pub fn to_wgs84(
    geometries: Vec<MultiPolygon<f64>>,
    source_epsg: u16,
) -> Result<Vec<MultiPolygon<f64>>, ReferenceError> {
    if source_epsg == WGS84_EPSG {
        return Ok(geometries);
    }

    info!(
        "Reprojecting {} geometries from EPSG:{} to EPSG:{}",
        geometries.len(),
        source_epsg,
        WGS84_EPSG
    );

    let projection_error = |message: String| ReferenceError::Projection {
        epsg: source_epsg,
        message,
    };

    let src = Proj::from_epsg_code(source_epsg).map_err(|e| projection_error(e.to_string()))?;
    let dst = Proj::from_epsg_code(WGS84_EPSG).map_err(|e| projection_error(e.to_string()))?;

    geometries
        .into_iter()
        .map(|geometry| geometry.try_map_coords(|coord| reproject_coord(&src, &dst, coord)))
        .collect::<Result<Vec<_>, String>>()
        .map_err(projection_error)
}

fn reproject_coord(src: &Proj, dst: &Proj, coord: Coord<f64>) -> Result<Coord<f64>, String> {
    // proj4rs works in radians for geographic systems
    let mut point = if src.is_latlong() {
        (coord.x.to_radians(), coord.y.to_radians(), 0.0)
    } else {
        (coord.x, coord.y, 0.0)
    };

    transform(src, dst, &mut point).map_err(|e| e.to_string())?;

    Ok(Coord {
        x: point.0.to_degrees(),
        y: point.1.to_degrees(),
    })
}
