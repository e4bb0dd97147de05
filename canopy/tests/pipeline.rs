use approx::assert_relative_eq;
use assert_matches::assert_matches;
use canopy::canopy_types::geo::Crs;
use canopy::config::{BoundaryRule, ScoringConfig};
use canopy::distance::nearest_road_distances;
use canopy::engine::{GeometryEngine, PlanarEngine};
use canopy::error::CanopyError;
use canopy::harmonize::Harmonizer;
use canopy::layer::{Layer, LayerKind, Layers, Road, Tree, Zone};
use canopy::pipeline::Pipeline;
use geo_types::{line_string, point, polygon, LineString, Polygon};
use insta::assert_compact_debug_snapshot;

fn utm() -> Crs {
    Crs::utm(35, true).unwrap()
}

fn square(x: f64, y: f64, size: f64) -> Polygon {
    polygon![
        (x: x, y: y),
        (x: x + size, y: y),
        (x: x + size, y: y + size),
        (x: x, y: y + size),
    ]
}

fn trees_in(prefix: &str, x: f64, y: f64, count: usize) -> Vec<Tree> {
    (0..count)
        .map(|i| {
            Tree::new(
                format!("{prefix}-{i}"),
                point!(x: x + 1.0 + (i % 8) as f64, y: y + 1.0 + (i / 8) as f64),
            )
        })
        .collect()
}

fn layers(trees: Vec<Tree>, zones: Vec<Zone>, roads: Vec<Road>) -> Layers {
    Layers::new(
        Layer::new(trees, utm()),
        Layer::new(zones, utm()),
        Layer::new(roads, utm()),
    )
}

#[test]
fn zone_next_to_the_road_outranks_denser_zone() {
    // A: 40 trees, 50 m from the road. B: 10 trees, the road runs along its edge.
    let mut trees = trees_in("a", 0.0, 0.0, 40);
    trees.extend(trees_in("b", 1000.0, 0.0, 10));
    let zones = vec![
        Zone::new("A", square(0.0, 0.0, 20.0)),
        Zone::new("B", square(1000.0, 0.0, 20.0)),
    ];
    let roads = vec![
        Road::new("r1", line_string![(x: 70.0, y: -50.0), (x: 70.0, y: 50.0)]),
        Road::new("r2", line_string![(x: 1020.0, y: -50.0), (x: 1020.0, y: 50.0)]),
    ];

    let report = Pipeline::new(ScoringConfig::default())
        .unwrap()
        .run(layers(trees, zones, roads))
        .unwrap();

    assert!(report.warnings.is_empty());
    let rows = report.ranked.rows();
    assert_eq!(rows[0].id, "B");
    assert_eq!(rows[0].tree_count, 10);
    assert_eq!(rows[0].nearest_road_distance, 0.0);
    assert_relative_eq!(rows[0].priority_score, 10_000_000.0, max_relative = 1e-9);

    assert_eq!(rows[1].id, "A");
    assert_eq!(rows[1].tree_count, 40);
    assert_relative_eq!(rows[1].nearest_road_distance, 50.0);
    assert_relative_eq!(rows[1].priority_score, 0.8, max_relative = 1e-6);
}

#[test]
fn no_roads_is_an_error() {
    let input = layers(
        trees_in("t", 0.0, 0.0, 3),
        vec![Zone::new("A", square(0.0, 0.0, 20.0))],
        vec![],
    );

    let result = Pipeline::new(ScoringConfig::default()).unwrap().run(input);
    assert_compact_debug_snapshot!(result.map(|_| ()), @"Err(EmptyLayer { layer: Roads })");
}

#[test]
fn only_malformed_roads_is_an_error() {
    let input = layers(
        trees_in("t", 0.0, 0.0, 3),
        vec![Zone::new("A", square(0.0, 0.0, 20.0))],
        vec![Road::new("dot", line_string![(x: 5.0, y: 5.0), (x: 5.0, y: 5.0)])],
    );

    let result = Pipeline::new(ScoringConfig::default()).unwrap().run(input);
    assert_matches!(result, Err(CanopyError::EmptyLayer { layer: LayerKind::Roads }));
}

#[test]
fn missing_crs_is_an_error() {
    let mut input = layers(
        trees_in("t", 0.0, 0.0, 3),
        vec![Zone::new("A", square(0.0, 0.0, 20.0))],
        vec![Road::new("r", line_string![(x: 0.0, y: -5.0), (x: 10.0, y: -5.0)])],
    );
    input.roads = Layer::without_crs(input.roads.features().to_vec());

    let result = Pipeline::new(ScoringConfig::default()).unwrap().run(input);
    assert_eq!(
        result.unwrap_err().to_string(),
        "roads layer has no coordinate reference system"
    );
}

#[test]
fn ties_are_ranked_by_identifier() {
    let zones = vec![
        Zone::new("Z2", square(0.0, 0.0, 20.0)),
        Zone::new("Z1", square(100.0, 0.0, 20.0)),
    ];
    let mut trees = trees_in("z2", 0.0, 0.0, 5);
    trees.extend(trees_in("z1", 100.0, 0.0, 5));
    let roads = vec![Road::new(
        "r",
        line_string![(x: -10.0, y: 0.0), (x: 200.0, y: 0.0)],
    )];

    let pipeline = Pipeline::new(ScoringConfig::default().with_epsilon(1.0)).unwrap();
    let report = pipeline.run(layers(trees, zones, roads)).unwrap();

    let rows = report.ranked.rows();
    assert_eq!(rows[0].id, "Z1");
    assert_eq!(rows[1].id, "Z2");
    assert_eq!(rows[0].priority_score, 5.0);
    assert_eq!(rows[1].priority_score, 5.0);
}

#[test]
fn tree_on_shared_edge_counts_for_both_zones() {
    let zones = vec![
        Zone::new("X", square(0.0, 0.0, 10.0)),
        Zone::new("Y", square(10.0, 0.0, 10.0)),
    ];
    let trees = vec![Tree::new("edge", point!(x: 10.0, y: 5.0))];
    let roads = vec![Road::new("r", line_string![(x: 0.0, y: -10.0), (x: 20.0, y: -10.0)])];
    let input = layers(trees, zones, roads);

    let report = Pipeline::new(ScoringConfig::default())
        .unwrap()
        .run(input.clone())
        .unwrap();
    for row in report.ranked.rows() {
        assert_eq!(row.tree_count, 1, "zone {}", row.id);
    }

    let report = Pipeline::new(ScoringConfig::default().with_boundary(BoundaryRule::Exclusive))
        .unwrap()
        .run(input)
        .unwrap();
    for row in report.ranked.rows() {
        assert_eq!(row.tree_count, 0, "zone {}", row.id);
        assert_eq!(row.priority_score, 0.0);
    }
}

#[test]
fn touching_road_gives_zero_distance() {
    let zones = vec![
        Zone::new("corner", square(0.0, 0.0, 10.0)),
        Zone::new("inside", square(100.0, 0.0, 10.0)),
    ];
    let roads = vec![
        Road::new("diag", line_string![(x: 10.0, y: 10.0), (x: 20.0, y: 20.0)]),
        Road::new("short", line_string![(x: 102.0, y: 2.0), (x: 103.0, y: 3.0)]),
    ];

    let report = Pipeline::new(ScoringConfig::default())
        .unwrap()
        .run(layers(trees_in("t", 0.0, 0.0, 1), zones, roads))
        .unwrap();

    for row in report.ranked.rows() {
        assert_eq!(row.nearest_road_distance, 0.0, "zone {}", row.id);
    }
}

#[test]
fn malformed_zone_is_excluded_with_warning() {
    let bow_tie = polygon![(x: 50.0, y: 0.0), (x: 52.0, y: 2.0), (x: 52.0, y: 0.0), (x: 50.0, y: 1.0)];
    let zones = vec![
        Zone::new("ok", square(0.0, 0.0, 10.0)),
        Zone::new("twisted", bow_tie),
    ];
    let roads = vec![Road::new("r", line_string![(x: 0.0, y: -10.0), (x: 60.0, y: -10.0)])];

    let report = Pipeline::new(ScoringConfig::default())
        .unwrap()
        .run(layers(trees_in("t", 0.0, 0.0, 2), zones, roads))
        .unwrap();

    assert_eq!(report.ranked.len(), 1);
    assert_eq!(report.ranked.rows()[0].id, "ok");
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].layer, LayerKind::Zones);
    assert_eq!(report.warnings[0].feature_id, "twisted");
    assert_eq!(report.warnings[0].reason, "self-intersecting ring");
}

#[test]
fn only_malformed_zones_is_an_error() {
    let bow_tie = polygon![(x: 50.0, y: 0.0), (x: 52.0, y: 2.0), (x: 52.0, y: 0.0), (x: 50.0, y: 1.0)];
    let input = layers(
        trees_in("t", 50.0, 0.0, 2),
        vec![Zone::new("twisted", bow_tie)],
        vec![Road::new("r", line_string![(x: 0.0, y: -10.0), (x: 60.0, y: -10.0)])],
    );

    let result = Pipeline::new(ScoringConfig::default()).unwrap().run(input);
    assert_compact_debug_snapshot!(result.map(|_| ()), @"Err(EmptyLayer { layer: Zones })");
}

#[test]
fn tree_inside_overlapping_zones_counts_for_both() {
    let zones = vec![
        Zone::new("big", square(0.0, 0.0, 20.0)),
        Zone::new("small", square(5.0, 5.0, 5.0)),
    ];
    let trees = vec![
        Tree::new("shared", point!(x: 7.0, y: 7.0)),
        Tree::new("big-only", point!(x: 15.0, y: 15.0)),
    ];
    let roads = vec![Road::new("r", line_string![(x: 0.0, y: -10.0), (x: 20.0, y: -10.0)])];

    for boundary in [BoundaryRule::Inclusive, BoundaryRule::Exclusive] {
        let report = Pipeline::new(ScoringConfig::default().with_boundary(boundary))
            .unwrap()
            .run(layers(trees.clone(), zones.clone(), roads.clone()))
            .unwrap();

        let counts: Vec<(&str, usize)> = report
            .ranked
            .rows()
            .iter()
            .map(|row| (row.id.as_str(), row.tree_count))
            .collect();
        assert_eq!(counts, vec![("big", 2), ("small", 1)]);
    }
}

#[test]
fn epsilon_that_overflows_the_score_is_rejected() {
    let result = Pipeline::new(ScoringConfig::default().with_epsilon(5e-324));
    assert_matches!(result, Err(CanopyError::Configuration(_)));

    let zones = vec![Zone::new("A", square(0.0, 0.0, 20.0))];
    let roads = vec![Road::new("r", line_string![(x: 0.0, y: 0.0), (x: 20.0, y: 0.0)])];
    let result = Pipeline::new(ScoringConfig::default().with_epsilon(f64::MIN_POSITIVE))
        .unwrap()
        .run(layers(trees_in("t", 0.0, 0.0, 10), zones, roads));
    assert_matches!(result, Err(CanopyError::Configuration(_)));
}

#[test]
fn reruns_give_the_same_ranking() {
    let zones: Vec<Zone> = (0..20)
        .map(|i| Zone::new(format!("z{:02}", 19 - i), square(i as f64 * 30.0, 0.0, 20.0)))
        .collect();
    let trees: Vec<Tree> = (0..20)
        .flat_map(|i| trees_in(&format!("t{i}"), i as f64 * 30.0, 0.0, i % 3))
        .collect();
    let roads = vec![Road::new("r", line_string![(x: 0.0, y: -5.0), (x: 600.0, y: -5.0)])];
    let input = layers(trees, zones, roads);

    let pipeline = Pipeline::new(ScoringConfig::default()).unwrap();
    let first = pipeline.run(input.clone()).unwrap();
    let second = pipeline.run(input).unwrap();
    assert_eq!(first, second);

    let rows = first.ranked.rows();
    for pair in rows.windows(2) {
        assert!(
            pair[0].priority_score > pair[1].priority_score
                || (pair[0].priority_score == pair[1].priority_score && pair[0].id < pair[1].id)
        );
    }
}

#[test]
fn harmonized_layers_score_the_same() {
    let zones = vec![Zone::new("A", square(29.5, -0.5, 0.002))];
    let trees = vec![Tree::new("t", point!(x: 29.501, y: -0.499))];
    let roads = vec![Road::new("r", line_string![(x: 29.49, y: -0.51), (x: 29.49, y: -0.49)])];
    let input = Layers::new(
        Layer::new(trees, Crs::WGS84),
        Layer::new(zones, Crs::WGS84),
        Layer::new(roads, Crs::WGS84),
    );

    let config = ScoringConfig::default();
    let engine = PlanarEngine::new(config.boundary());
    let harmonized = Harmonizer::new(&config, &engine).harmonize(input.clone()).unwrap();

    let pipeline = Pipeline::new(config).unwrap();
    let from_source = pipeline.run(input).unwrap();
    let from_harmonized = pipeline.run(harmonized.layers.into_layers()).unwrap();

    assert_eq!(from_source, from_harmonized);
    assert_eq!(from_source.ranked.rows()[0].tree_count, 1);
    // 0.01° of longitude near the equator is a bit more than a kilometer.
    let distance = from_source.ranked.rows()[0].nearest_road_distance;
    assert!(distance > 1000.0 && distance < 1200.0, "{distance}");
}

/// Deterministic pseudo-random numbers in `[0, 1)`.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[test]
fn indexed_distance_equals_brute_force() {
    let mut rng = Lcg(42);
    let zones: Vec<Zone> = (0..60)
        .map(|i| {
            let x = rng.next() * 10_000.0;
            let y = rng.next() * 10_000.0;
            let size = 10.0 + rng.next() * 200.0;
            Zone::new(format!("z{i}"), square(x, y, size))
        })
        .collect();
    let roads: Vec<Road> = (0..40)
        .map(|i| {
            let mut x = rng.next() * 10_000.0;
            let mut y = rng.next() * 10_000.0;
            let mut points = vec![(x, y)];
            for _ in 0..3 {
                x += 1.0 + rng.next() * 500.0;
                y += (rng.next() - 0.5) * 500.0;
                points.push((x, y));
            }
            Road::new(format!("r{i}"), LineString::from(points))
        })
        .collect();

    let config = ScoringConfig::default();
    let engine = PlanarEngine::default();
    let harmonized = Harmonizer::new(&config, &engine)
        .harmonize(layers(trees_in("t", 0.0, 0.0, 1), zones, roads))
        .unwrap()
        .layers;

    let indexed = nearest_road_distances(&harmonized, &engine).unwrap();
    assert!(indexed.warnings.is_empty());

    for (zone, distance) in harmonized.zones().iter().zip(&indexed.distances) {
        let brute_force = harmonized
            .roads()
            .iter()
            .map(|road| engine.distance(&zone.geometry, &road.geometry))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(*distance, Some(brute_force), "zone {}", zone.id);
    }
}
