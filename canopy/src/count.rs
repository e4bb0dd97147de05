//! Counting trees inside zones.

use crate::engine::GeometryEngine;
use crate::error::GeometryWarning;
use crate::layer::{HarmonizedLayers, LayerKind, Tree, Zone};
use canopy_types::cartesian::{BoundingRect, CartesianPoint2d};
use rayon::prelude::*;
use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};

type TreeItem = GeomWithData<[f64; 2], usize>;

/// R-tree over tree locations. Trees with non-finite coordinates are not indexed.
pub struct TreeIndex<'a> {
    trees: &'a [Tree],
    rtree: RTree<TreeItem>,
}

impl<'a> TreeIndex<'a> {
    /// Builds the index. Returns warnings for the trees that cannot be indexed.
    pub fn new(trees: &'a [Tree]) -> (Self, Vec<GeometryWarning>) {
        let mut warnings = vec![];
        let mut items = Vec::with_capacity(trees.len());
        for (index, tree) in trees.iter().enumerate() {
            if tree.location.is_finite() {
                items.push(GeomWithData::new([tree.location.x(), tree.location.y()], index));
            } else {
                let warning =
                    GeometryWarning::new(LayerKind::Trees, &tree.id, "non-finite coordinates");
                log::warn!("{warning}");
                warnings.push(warning);
            }
        }

        log::debug!("Building tree index over {} locations", items.len());
        let index = Self {
            trees,
            rtree: RTree::bulk_load(items),
        };

        (index, warnings)
    }

    /// Number of trees that belong to the zone according to the engine.
    pub fn count_in<E: GeometryEngine + ?Sized>(&self, zone: &Zone, engine: &E) -> usize {
        let Some(bbox) = zone.geometry.bounding_rect() else {
            return 0;
        };

        // Envelope query is inclusive, so trees on the bounding box edge are candidates too.
        let (min, max) = bbox.corners();
        self.rtree
            .locate_in_envelope(&AABB::from_corners(min, max))
            .filter(|item| engine.contains(&zone.geometry, &self.trees[item.data].location))
            .count()
    }
}

/// Number of trees per zone.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeCounts {
    /// Count for every zone, in the order of the harmonized zones.
    pub counts: Vec<usize>,
    /// Trees that were not considered.
    pub warnings: Vec<GeometryWarning>,
}

/// Counts trees for every zone. A tree can count toward several zones when the zones overlap or share a boundary.
pub fn count_trees<E: GeometryEngine + ?Sized>(layers: &HarmonizedLayers, engine: &E) -> TreeCounts {
    log::info!(
        "Counting {} trees in {} zones",
        layers.trees().len(),
        layers.zones().len()
    );

    let (index, warnings) = TreeIndex::new(layers.trees());
    let counts: Vec<usize> = layers
        .zones()
        .par_iter()
        .map(|zone| index.count_in(zone, engine))
        .collect();

    log::info!(
        "Counted {} trees in zones",
        counts.iter().sum::<usize>()
    );

    TreeCounts { counts, warnings }
}
