//! Reprojection of input layers into the target coordinate system.

use crate::config::ScoringConfig;
use crate::engine::GeometryEngine;
use crate::error::{CanopyError, GeometryWarning};
use crate::layer::{Feature, HarmonizedLayers, Layer, Layers};
use canopy_types::error::CanopyTypesError;
use canopy_types::geo::Crs;
use geo_types::Geometry;

/// Result of harmonization: layers in the target CRS and the features that had to be left out.
#[derive(Debug)]
pub struct Harmonized {
    /// Reprojected layers.
    pub layers: HarmonizedLayers,
    /// Features that could not be reprojected.
    pub warnings: Vec<GeometryWarning>,
}

/// Brings all layers into the target CRS of the configuration.
///
/// Every layer must declare its CRS and contain at least one feature, otherwise harmonization fails before any
/// coordinates are converted. Features keep their identifiers, the order of parts and vertices. A feature whose
/// coordinates cannot be converted is excluded with a warning.
pub struct Harmonizer<'a, E: ?Sized> {
    config: &'a ScoringConfig,
    engine: &'a E,
}

impl<'a, E: GeometryEngine + ?Sized> Harmonizer<'a, E> {
    /// Creates a new harmonizer.
    pub fn new(config: &'a ScoringConfig, engine: &'a E) -> Self {
        Self { config, engine }
    }

    /// Reprojects the layers.
    pub fn harmonize(&self, layers: Layers) -> Result<Harmonized, CanopyError> {
        let Layers {
            trees,
            zones,
            roads,
        } = layers;

        let trees_crs = checked_crs(&trees)?;
        let zones_crs = checked_crs(&zones)?;
        let roads_crs = checked_crs(&roads)?;

        let target = self.config.target_crs();
        log::info!(
            "Harmonizing {} trees, {} zones and {} roads into {target}",
            trees.len(),
            zones.len(),
            roads.len()
        );

        let mut warnings = vec![];
        let trees = self.reproject_layer(trees, &trees_crs, &mut warnings)?;
        let zones = self.reproject_layer(zones, &zones_crs, &mut warnings)?;
        let roads = self.reproject_layer(roads, &roads_crs, &mut warnings)?;

        Ok(Harmonized {
            layers: HarmonizedLayers::new(target.clone(), trees, zones, roads),
            warnings,
        })
    }

    fn reproject_layer<F: Feature>(
        &self,
        layer: Layer<F>,
        source: &Crs,
        warnings: &mut Vec<GeometryWarning>,
    ) -> Result<Vec<F>, CanopyError> {
        let target = self.config.target_crs();
        let (_, features) = layer.into_parts();

        let geometries: Vec<Geometry> = features
            .iter()
            .map(|feature| feature.geometry().clone().into())
            .collect();
        let projected = self.engine.reproject_many(&geometries, source, target)?;

        let mut result = Vec::with_capacity(features.len());
        for (feature, geometry) in features.into_iter().zip(projected) {
            let geometry = geometry.and_then(|geometry| {
                <F::Geom as TryFrom<Geometry>>::try_from(geometry).map_err(|_| {
                    CanopyError::Projection(CanopyTypesError::Projection(
                        "geometry type changed during reprojection".into(),
                    ))
                })
            });

            match geometry {
                Ok(geometry) => result.push(F::from_parts(feature.id().to_string(), geometry)),
                Err(err) => {
                    let warning = GeometryWarning::new(F::KIND, feature.id(), err.to_string());
                    log::warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        if result.is_empty() {
            return Err(CanopyError::EmptyLayer { layer: F::KIND });
        }

        log::debug!("{} {} features are in {target}", result.len(), F::KIND);
        Ok(result)
    }
}

fn checked_crs<F: Feature>(layer: &Layer<F>) -> Result<Crs, CanopyError> {
    let crs = layer
        .crs()
        .cloned()
        .ok_or(CanopyError::MissingCrs { layer: F::KIND })?;
    if layer.is_empty() {
        return Err(CanopyError::EmptyLayer { layer: F::KIND });
    }

    Ok(crs)
}
