#![cfg(feature = "geojson")]

use canopy::canopy_types::geo::Crs;
use canopy::config::ScoringConfig;
use canopy::layer::LayerKind;
use canopy::pipeline::Pipeline;
use canopy::source::{GeoJsonSource, LayerSource};
use std::path::PathBuf;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("examples/data")
        .join(name)
}

fn source() -> GeoJsonSource {
    GeoJsonSource::new(
        data("trees.geojson"),
        data("zones.geojson"),
        data("roads.geojson"),
    )
}

#[test]
fn sample_data_is_loaded() {
    let loaded = source()
        .with_fallback_crs(Crs::WGS84)
        .load_layers()
        .unwrap();

    let zones: Vec<&str> = loaded
        .layers
        .zones
        .features()
        .iter()
        .map(|zone| zone.id.as_str())
        .collect();
    assert_eq!(zones, vec!["Kalunguta", "Mutwanga", "Mangina", "Oicha"]);

    // P-003 is listed twice, P-005 holds three points, P-008 is not a point.
    assert_eq!(loaded.layers.trees.len(), 9);
    assert_eq!(loaded.layers.roads.len(), 2);
    assert_eq!(loaded.layers.roads.features()[1].id, "track-12");

    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.warnings[0].layer, LayerKind::Trees);
    assert_eq!(loaded.warnings[0].feature_id, "P-008");
}

#[test]
fn trees_without_crs_stop_the_run() {
    let result = Pipeline::new(ScoringConfig::default())
        .unwrap()
        .run_source(&source());

    assert_eq!(
        result.unwrap_err().to_string(),
        "trees layer has no coordinate reference system"
    );
}

#[test]
fn sample_data_is_ranked() {
    let report = Pipeline::new(ScoringConfig::default())
        .unwrap()
        .run_source(&source().with_fallback_crs(Crs::WGS84))
        .unwrap();

    let ranked: Vec<(&str, usize)> = report
        .ranked
        .rows()
        .iter()
        .map(|row| (row.id.as_str(), row.tree_count))
        .collect();
    assert_eq!(
        ranked,
        vec![("Mangina", 4), ("Kalunguta", 3), ("Mutwanga", 1)]
    );

    let top = report.ranked.top_priority().unwrap();
    assert_eq!(top.nearest_road_distance, 0.0);

    let kalunguta = &report.ranked.rows()[1];
    assert!(
        kalunguta.nearest_road_distance > 50.0 && kalunguta.nearest_road_distance < 60.0,
        "{}",
        kalunguta.nearest_road_distance
    );

    let excluded: Vec<(LayerKind, &str)> = report
        .warnings
        .iter()
        .map(|w| (w.layer, w.feature_id.as_str()))
        .collect();
    assert_eq!(
        excluded,
        vec![(LayerKind::Trees, "P-008"), (LayerKind::Zones, "Oicha")]
    );

    let printed = report.to_string();
    assert!(printed.contains("| Mangina   |"));
    assert!(printed.contains("Oicha"));
}
