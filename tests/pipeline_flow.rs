use std::collections::HashMap;
use std::fs;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use geo::{polygon, MultiPolygon};

use qct_dda::census::FipsResolver;
use qct_dda::config::{CensusConfig, DataConfig, GeocoderConfig};
use qct_dda::geocode::{GeocodeCandidate, Geocoder};
use qct_dda::models::LookupStage;
use qct_dda::pip::{DdaZone, DdaZones, WGS84_EPSG};
use qct_dda::reference::{QctSet, ReferenceData};
use qct_dda::{AddressOutcome, FailureKind, GeoPoint, LookupError, Pipeline};

const WILSHIRE_RESULTS: &str = r#"[
    {"display_name": "Wilshire, Los Angeles County, California, United States", "lat": "34.1"},
    {"display_name": "Wilshire Boulevard, Los Angeles, California, United States",
     "class": "highway", "lat": "34.0600", "lon": "-118.3400"},
    {"display_name": "5455, Wilshire Avenue, Reno, Nevada, United States",
     "class": "place", "lat": "39.5000", "lon": "-119.8000"},
    {"display_name": "5455, Wilshire Boulevard, Mid-Wilshire, Los Angeles, California, 90036, United States",
     "class": "place", "lat": "34.0622", "lon": "-118.349"},
    {"display_name": "5455, Wilshire Boulevard, Beverly Hills, California, United States",
     "class": "place", "lat": "34.0700", "lon": "-118.4000"}
]"#;

async fn nominatim(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    if headers.get("user-agent").and_then(|v| v.to_str().ok()) != Some("Mozilla/5.0") {
        return (StatusCode::FORBIDDEN, String::new());
    }
    if params.get("format").map(String::as_str) != Some("json") {
        return (StatusCode::BAD_REQUEST, String::new());
    }

    match params.get("q").map(String::as_str) {
        Some("5455 Wilshire Blvd") => (StatusCode::OK, WILSHIRE_RESULTS.to_string()),
        Some("2331 Portland St") => (
            StatusCode::OK,
            r#"[{"display_name": "2331, Portland Street, Los Angeles, California, United States",
                 "class": "place", "lat": "34.0301", "lon": "-118.2790"}]"#
                .to_string(),
        ),
        Some("1 Ocean Front Walk") => (
            StatusCode::OK,
            r#"[{"display_name": "1, Ocean Front Walk, Venice, California, United States",
                 "class": "place", "lat": "33.98", "lon": "-118.47"}]"#
                .to_string(),
        ),
        Some("100 Portland Ave") => (
            StatusCode::OK,
            r#"[{"display_name": "100, Portland Avenue, Portland, Oregon, United States",
                 "class": "place", "lat": "45.5", "lon": "-122.6"}]"#
                .to_string(),
        ),
        Some("empty body") => (StatusCode::OK, String::new()),
        Some("not json") => (StatusCode::OK, "<html>rate limited</html>".to_string()),
        Some("server error") => (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
        _ => (StatusCode::OK, "[]".to_string()),
    }
}

async fn fcc_area(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    if params.get("format").map(String::as_str) != Some("json") {
        return (StatusCode::BAD_REQUEST, String::new());
    }

    let block = match params.get("lat").map(String::as_str) {
        Some("34.0622") => "060372099201000",
        Some("34.0301") => "060372246001001",
        _ => return (StatusCode::OK, r#"{"input": {}, "results": []}"#.to_string()),
    };

    let body = format!(
        r#"{{"results": [{{"block_fips": "{}", "county_fips": "06037",
            "county_name": "Los Angeles County", "state_code": "CA"}}]}}"#,
        block
    );
    (StatusCode::OK, body)
}

async fn spawn_services() -> String {
    let app = Router::new()
        .route("/search", get(nominatim))
        .route("/api/census/area", get(fcc_area));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    format!("http://{}", addr)
}

fn geocoder(base: &str) -> Geocoder {
    Geocoder::new(&GeocoderConfig {
        endpoint: format!("{}/search", base),
        ..GeocoderConfig::default()
    })
    .expect("geocoder")
}

fn resolver(base: &str) -> FipsResolver {
    FipsResolver::new(&CensusConfig {
        endpoint: format!("{}/api/census/area", base),
        ..CensusConfig::default()
    })
    .expect("resolver")
}

/// A box over Mid-Wilshire that excludes the Portland St location
fn mid_wilshire_dda() -> DdaZones {
    let zone = DdaZone::new(MultiPolygon::new(vec![polygon![
        (x: -118.40, y: 34.04),
        (x: -118.30, y: 34.04),
        (x: -118.30, y: 34.10),
        (x: -118.40, y: 34.10),
        (x: -118.40, y: 34.04),
    ]]));
    DdaZones::build(vec![zone], WGS84_EPSG)
}

async fn pipeline(qct: QctSet, dda: DdaZones) -> Pipeline {
    let base = spawn_services().await;
    Pipeline::new(
        geocoder(&base),
        resolver(&base),
        ReferenceData::new(qct, dda),
    )
}

#[tokio::test]
async fn geocode_selects_first_matching_place() {
    let base = spawn_services().await;
    let located = geocoder(&base)
        .geocode("5455 Wilshire Blvd")
        .await
        .expect("geocode succeeds");

    assert_eq!(located.point, GeoPoint::new(34.0622, -118.349));
    assert!(located.display_name.contains("Mid-Wilshire"));
}

#[tokio::test]
async fn geocode_failures_are_typed() {
    let base = spawn_services().await;
    let geocoder = geocoder(&base);

    let err = geocoder.geocode("empty body").await.unwrap_err();
    assert!(matches!(err, LookupError::EmptyResponse));

    let err = geocoder.geocode("not json").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Parse);

    let err = geocoder.geocode("server error").await.unwrap_err();
    assert!(matches!(err, LookupError::Status(s) if s.as_u16() == 500));

    let err = geocoder.geocode("unknown place").await.unwrap_err();
    assert!(matches!(err, LookupError::NoResults));

    let err = geocoder.geocode("100 Portland Ave").await.unwrap_err();
    assert!(matches!(err, LookupError::NoMatch { ref region } if region == "California"));
}

#[tokio::test]
async fn geocode_with_custom_filter() {
    let base = spawn_services().await;
    let geocoder =
        geocoder(&base).with_filter(|c: &GeocodeCandidate| c.display_name.contains("Nevada"));

    let located = geocoder.geocode("5455 Wilshire Blvd").await.unwrap();
    assert_eq!(located.point, GeoPoint::new(39.5, -119.8));
}

#[tokio::test]
async fn resolve_fips_is_eleven_digits() {
    let base = spawn_services().await;
    let resolver = resolver(&base);

    let fips = resolver
        .resolve(GeoPoint::new(34.0622, -118.349))
        .await
        .expect("tract resolves");
    assert_eq!(fips.as_str(), "06037209920");
    assert_eq!(fips.as_str().len(), 11);

    let err = resolver
        .resolve(GeoPoint::new(33.98, -118.47))
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::NoResults));
}

#[tokio::test]
async fn qct_match_with_full_width_code() {
    let pipeline = pipeline(QctSet::from_codes(["06037209920"]), mid_wilshire_dda()).await;

    let outcome = pipeline.check("5455 Wilshire Blvd").await;
    let result = outcome.result().expect("address determined");
    assert!(result.is_in_qct);
    assert!(result.is_in_dda);
    assert_eq!(result.fips.as_str(), "06037209920");
}

#[tokio::test]
async fn qct_match_after_zero_padding() {
    let dir = tempfile::tempdir().unwrap();
    let qct_file = dir.path().join("QCT2025.csv");
    fs::write(&qct_file, "fips,state,county\n6037209920,6,37\n6037224600,6,37\n").unwrap();
    let dda_file = dir.path().join("DDA2024.geojson");
    fs::write(&dda_file, r#"{"type": "FeatureCollection", "features": []}"#).unwrap();

    let reference = ReferenceData::load(&DataConfig {
        qct_file,
        dda_file,
        dda_epsg: None,
    })
    .expect("reference data loads");

    let base = spawn_services().await;
    let pipeline = Pipeline::new(geocoder(&base), resolver(&base), reference);

    let outcome = pipeline.check("5455 Wilshire Blvd").await;
    let result = outcome.result().expect("address determined");
    assert!(result.is_in_qct);
    assert!(!result.is_in_dda);
}

#[tokio::test]
async fn empty_dda_never_matches() {
    let pipeline = pipeline(QctSet::default(), DdaZones::default()).await;

    let mut results = Vec::new();
    let summary = pipeline
        .run(["5455 Wilshire Blvd", "2331 Portland St"], |r| {
            results.push(r.clone())
        })
        .await;

    assert_eq!(summary.determined, 2);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.is_in_dda && !r.is_in_qct));
}

#[tokio::test]
async fn empty_geocode_body_skips_and_continues() {
    let pipeline = pipeline(
        QctSet::from_codes(["6037224600"]),
        mid_wilshire_dda(),
    )
    .await;

    let mut results = Vec::new();
    let summary = pipeline
        .run(["empty body", "2331 Portland St"], |r| results.push(r.clone()))
        .await;

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.determined, 1);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].address, "2331 Portland St");
    assert!(results[0].is_in_qct);
    assert!(!results[0].is_in_dda);
}

#[tokio::test]
async fn skipped_outcomes_name_their_stage() {
    let pipeline = pipeline(QctSet::default(), mid_wilshire_dda()).await;

    match pipeline.check("empty body").await {
        AddressOutcome::Skipped { stage, error, .. } => {
            assert_eq!(stage, LookupStage::Geocode);
            assert!(matches!(error, LookupError::EmptyResponse));
        }
        other => panic!("expected skip, got {:?}", other),
    }

    match pipeline.check("1 Ocean Front Walk").await {
        AddressOutcome::Skipped { stage, error, .. } => {
            assert_eq!(stage, LookupStage::Fips);
            assert_eq!(error.kind(), FailureKind::NotFound);
        }
        other => panic!("expected skip, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_reference_files_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = ReferenceData::load(&DataConfig {
        qct_file: dir.path().join("QCT2025.csv"),
        dda_file: dir.path().join("DDA2024.shp"),
        dda_epsg: None,
    })
    .unwrap_err();

    assert!(matches!(err, qct_dda::ReferenceError::Missing { .. }));
}
