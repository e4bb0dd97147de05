//! Distance from zones to the nearest road.
//!
//! Roads are put into an R-tree by their bounding boxes. For a zone, the road closest to one of the zone vertices
//! gives an upper bound of the distance. Only roads whose bounding boxes come within that bound of the zone bounding
//! box can be closer, so exact distances are computed for them only. The result is always the same as comparing the
//! zone with every road.
//!
//! Malformed zones and roads are excluded before indexing and reported as [`GeometryWarning`]s.

use crate::engine::GeometryEngine;
use crate::error::{CanopyError, GeometryWarning};
use crate::layer::{HarmonizedLayers, LayerKind, Road, Zone};
use canopy_types::cartesian::{BoundingRect, CartesianContour, CartesianPoint2d};
use geo_types::{LineString, MultiLineString, MultiPolygon};
use rayon::prelude::*;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

type RoadItem = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Returns the reason the zone geometry cannot be used, if any.
pub fn zone_defect(geometry: &MultiPolygon) -> Option<&'static str> {
    if geometry.0.is_empty() || geometry.0.iter().any(|p| p.exterior().0.is_empty()) {
        return Some("empty geometry");
    }

    let mut rings = geometry
        .0
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()));
    if !rings.clone().all(|ring| ring.0.iter().all(|c| c.is_finite())) {
        return Some("non-finite coordinates");
    }

    rings.find_map(ring_defect)
}

fn ring_defect(ring: &LineString) -> Option<&'static str> {
    if ring.0.len() < 4 {
        Some("ring has less than three vertices")
    } else if ring.area_signed() == 0.0 {
        Some("ring has zero area")
    } else if ring.has_self_intersection() {
        Some("self-intersecting ring")
    } else {
        None
    }
}

/// Returns the reason the road geometry cannot be used, if any.
pub fn road_defect(geometry: &MultiLineString) -> Option<&'static str> {
    if geometry.0.is_empty() || geometry.0.iter().all(|line| line.0.is_empty()) {
        return Some("empty geometry");
    }

    if !geometry.0.iter().all(|line| line.0.iter().all(|c| c.is_finite())) {
        return Some("non-finite coordinates");
    }

    if geometry.0.iter().any(|line| line.length() == 0.0) {
        return Some("zero-length line");
    }

    None
}

/// Spatial index over valid roads.
pub struct RoadIndex<'a> {
    roads: &'a [Road],
    rtree: RTree<RoadItem>,
}

impl<'a> RoadIndex<'a> {
    /// Builds the index. Returns warnings for the roads that were excluded.
    pub fn new(roads: &'a [Road]) -> (Self, Vec<GeometryWarning>) {
        let mut warnings = vec![];
        let mut items = Vec::with_capacity(roads.len());
        for (index, road) in roads.iter().enumerate() {
            let defect = road_defect(&road.geometry);
            match (defect, road.geometry.bounding_rect()) {
                (None, Some(bbox)) => {
                    let (min, max) = bbox.corners();
                    items.push(GeomWithData::new(Rectangle::from_corners(min, max), index));
                }
                (defect, _) => {
                    let warning = GeometryWarning::new(
                        LayerKind::Roads,
                        &road.id,
                        defect.unwrap_or("empty geometry"),
                    );
                    log::warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        log::debug!("Building road index over {} roads", items.len());
        let index = Self {
            roads,
            rtree: RTree::bulk_load(items),
        };

        (index, warnings)
    }

    /// Number of indexed roads.
    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    /// Returns true if no road was indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest distance from the zone to any indexed road. `None` if the index or the zone is empty.
    pub fn nearest_distance<E: GeometryEngine + ?Sized>(&self, zone: &Zone, engine: &E) -> Option<f64> {
        let bbox = zone.geometry.bounding_rect()?;
        let anchor = zone.geometry.0.first()?.exterior().0.first()?;

        let seed = self.rtree.nearest_neighbor(&[anchor.x, anchor.y])?;
        let bound = engine.distance(&zone.geometry, &self.roads[seed.data].geometry);
        if bound == 0.0 {
            return Some(0.0);
        }

        let (min, max) = bbox.expand(bound).corners();
        let distance = self
            .rtree
            .locate_in_envelope_intersecting(&AABB::from_corners(min, max))
            .map(|item| engine.distance(&zone.geometry, &self.roads[item.data].geometry))
            .fold(bound, f64::min);

        Some(distance)
    }
}

/// Distance to the nearest road for every zone.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadDistances {
    /// Distance for every zone, in the order of the harmonized zones. `None` for excluded zones.
    pub distances: Vec<Option<f64>>,
    /// Zones and roads that were excluded.
    pub warnings: Vec<GeometryWarning>,
}

/// Computes the distance from every zone to the nearest road of the whole road layer.
///
/// Fails with [`CanopyError::EmptyLayer`] if no valid road is left after excluding malformed ones.
pub fn nearest_road_distances<E: GeometryEngine + ?Sized>(
    layers: &HarmonizedLayers,
    engine: &E,
) -> Result<RoadDistances, CanopyError> {
    log::info!(
        "Measuring distances from {} zones to {} roads",
        layers.zones().len(),
        layers.roads().len()
    );

    let (index, mut warnings) = RoadIndex::new(layers.roads());
    if index.is_empty() {
        return Err(CanopyError::EmptyLayer {
            layer: LayerKind::Roads,
        });
    }

    let distances: Vec<Result<f64, GeometryWarning>> = layers
        .zones()
        .par_iter()
        .map(|zone| {
            if let Some(defect) = zone_defect(&zone.geometry) {
                return Err(GeometryWarning::new(LayerKind::Zones, &zone.id, defect));
            }

            index
                .nearest_distance(zone, engine)
                .ok_or_else(|| GeometryWarning::new(LayerKind::Zones, &zone.id, "empty geometry"))
        })
        .collect();

    let distances = distances
        .into_iter()
        .map(|result| match result {
            Ok(distance) => Some(distance),
            Err(warning) => {
                log::warn!("{warning}");
                warnings.push(warning);
                None
            }
        })
        .collect::<Vec<_>>();

    let measured = distances.iter().flatten().count();
    if measured == 0 {
        return Err(CanopyError::EmptyLayer {
            layer: LayerKind::Zones,
        });
    }

    log::info!("Measured road distances for {measured} zones");

    Ok(RoadDistances {
        distances,
        warnings,
    })
}
