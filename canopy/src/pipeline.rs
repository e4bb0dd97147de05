//! Complete scoring run: harmonization, the two aggregation steps and ranking.

use crate::config::ScoringConfig;
use crate::count::{count_trees, TreeCounts};
use crate::distance::{nearest_road_distances, RoadDistances};
use crate::engine::{GeometryEngine, PlanarEngine};
use crate::error::{CanopyError, GeometryWarning};
use crate::harmonize::Harmonizer;
use crate::layer::{HarmonizedLayers, Layers};
use crate::score::{RankedResult, ZoneMetrics};
use crate::source::LayerSource;

/// Outcome of a scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Ranked zones.
    pub ranked: RankedResult,
    /// Features excluded during the run.
    pub warnings: Vec<GeometryWarning>,
}

/// Runs all the steps of scoring with one configuration.
///
/// ```no_run
/// use canopy::config::ScoringConfig;
/// use canopy::pipeline::Pipeline;
/// use canopy::source::GeoJsonSource;
///
/// let source = GeoJsonSource::new("trees.geojson", "zones.geojson", "roads.geojson");
/// let report = Pipeline::new(ScoringConfig::default())
///     .unwrap()
///     .run_source(&source)
///     .unwrap();
/// println!("{report}");
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline<E = PlanarEngine> {
    config: ScoringConfig,
    engine: E,
}

impl Pipeline {
    /// Creates a pipeline with the [`PlanarEngine`] following the boundary rule of the configuration.
    pub fn new(config: ScoringConfig) -> Result<Self, CanopyError> {
        let engine = PlanarEngine::new(config.boundary());
        Self::with_engine(config, engine)
    }
}

impl<E: GeometryEngine> Pipeline<E> {
    /// Creates a pipeline with a custom geometry engine.
    pub fn with_engine(config: ScoringConfig, engine: E) -> Result<Self, CanopyError> {
        config.validate()?;
        Ok(Self { config, engine })
    }

    /// Configuration of the pipeline.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Loads the layers from the source and scores them.
    pub fn run_source(&self, source: &(impl LayerSource + ?Sized)) -> Result<Report, CanopyError> {
        let loaded = source.load_layers()?;
        let mut report = self.run(loaded.layers)?;

        let mut warnings = loaded.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;

        Ok(report)
    }

    /// Scores the layers.
    pub fn run(&self, layers: Layers) -> Result<Report, CanopyError> {
        let harmonized = Harmonizer::new(&self.config, &self.engine).harmonize(layers)?;
        let mut report = self.score(&harmonized.layers)?;

        let mut warnings = harmonized.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;

        Ok(report)
    }

    /// Scores already harmonized layers.
    ///
    /// Tree counting and distance measuring run in parallel. Zones excluded by the distance step because of malformed
    /// geometry do not appear in the ranking.
    pub fn score(&self, layers: &HarmonizedLayers) -> Result<Report, CanopyError> {
        let (counts, distances) = rayon::join(
            || count_trees(layers, &self.engine),
            || nearest_road_distances(layers, &self.engine),
        );
        let TreeCounts {
            counts,
            warnings: mut count_warnings,
        } = counts;
        let RoadDistances {
            distances,
            warnings: mut distance_warnings,
        } = distances?;

        let metrics = layers
            .zones()
            .iter()
            .zip(counts)
            .zip(distances)
            .filter_map(|((zone, count), distance)| {
                Some(
                    ZoneMetrics::new(zone.id.clone())
                        .with_tree_count(count)
                        .with_road_distance(distance?),
                )
            })
            .collect();

        let ranked = RankedResult::rank(metrics, self.config.epsilon())?;
        if let Some(top) = ranked.top_priority() {
            log::info!(
                "Ranked {} zones, top priority zone is `{}` with score {:.3}",
                ranked.len(),
                top.id,
                top.priority_score
            );
        }

        let mut warnings = vec![];
        warnings.append(&mut count_warnings);
        warnings.append(&mut distance_warnings);

        Ok(Report { ranked, warnings })
    }
}
