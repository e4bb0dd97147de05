//! Geometric operations the aggregation steps are built upon.

use crate::config::BoundaryRule;
use crate::error::CanopyError;
use canopy_types::cartesian::CartesianPolygon;
use canopy_types::error::CanopyTypesError;
use canopy_types::geo::Crs;
use canopy_types::Project;
use geo_types::{Geometry, MultiLineString, MultiPolygon, Point};

/// Geometry capabilities needed by the engine.
///
/// All geometries given to [`contains`](GeometryEngine::contains) and [`distance`](GeometryEngine::distance) are
/// expected to be in the same planar coordinate system.
pub trait GeometryEngine: Send + Sync {
    /// Returns true if the point belongs to the polygon.
    fn contains(&self, polygon: &MultiPolygon, point: &Point) -> bool;

    /// Smallest distance between the polygon (including its interior) and any part of the line. Zero if they touch or
    /// intersect. Infinite if either of geometries is empty.
    fn distance(&self, polygon: &MultiPolygon, line: &MultiLineString) -> f64;

    /// Converts the geometry from one coordinate system to another.
    fn reproject(&self, geometry: &Geometry, from: &Crs, to: &Crs) -> Result<Geometry, CanopyError>;

    /// Converts a batch of geometries sharing the same coordinate system. An error in the outer result means that no
    /// geometry can be converted at all. Geometries that failed individually are returned as inner errors.
    fn reproject_many(
        &self,
        geometries: &[Geometry],
        from: &Crs,
        to: &Crs,
    ) -> Result<Vec<Result<Geometry, CanopyError>>, CanopyError> {
        Ok(geometries
            .iter()
            .map(|geometry| self.reproject(geometry, from, to))
            .collect())
    }
}

/// Engine working on planar coordinates.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanarEngine {
    boundary: BoundaryRule,
}

impl PlanarEngine {
    /// Creates a new engine.
    pub fn new(boundary: BoundaryRule) -> Self {
        Self { boundary }
    }

    /// Boundary rule used by [`GeometryEngine::contains`].
    pub fn boundary(&self) -> BoundaryRule {
        self.boundary
    }
}

fn projection_failed(from: &Crs, to: &Crs) -> CanopyError {
    CanopyError::Projection(CanopyTypesError::Projection(format!(
        "geometry cannot be converted from {from} to {to}"
    )))
}

impl GeometryEngine for PlanarEngine {
    fn contains(&self, polygon: &MultiPolygon, point: &Point) -> bool {
        polygon.contains_point(point, self.boundary.includes_boundary())
    }

    fn distance(&self, polygon: &MultiPolygon, line: &MultiLineString) -> f64 {
        line.0
            .iter()
            .filter_map(|part| polygon.distance_to_contour_sq(part))
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    fn reproject(&self, geometry: &Geometry, from: &Crs, to: &Crs) -> Result<Geometry, CanopyError> {
        if from == to {
            return Ok(geometry.clone());
        }

        let transform = from.transform_to(to)?;
        geometry
            .project(&*transform)
            .ok_or_else(|| projection_failed(from, to))
    }

    fn reproject_many(
        &self,
        geometries: &[Geometry],
        from: &Crs,
        to: &Crs,
    ) -> Result<Vec<Result<Geometry, CanopyError>>, CanopyError> {
        if from == to {
            return Ok(geometries.iter().cloned().map(Ok).collect());
        }

        let transform = from.transform_to(to)?;
        Ok(geometries
            .iter()
            .map(|geometry| {
                geometry
                    .project(&*transform)
                    .ok_or_else(|| projection_failed(from, to))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geo_types::{line_string, point, polygon};

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]
        .into()
    }

    #[test]
    fn contains_follows_boundary_rule() {
        let zone = square(0.0, 0.0, 10.0);
        let on_edge = point!(x: 10.0, y: 5.0);

        assert!(PlanarEngine::new(BoundaryRule::Inclusive).contains(&zone, &on_edge));
        assert!(!PlanarEngine::new(BoundaryRule::Exclusive).contains(&zone, &on_edge));
        assert!(PlanarEngine::new(BoundaryRule::Exclusive).contains(&zone, &point!(x: 5.0, y: 5.0)));
    }

    #[test]
    fn distance_takes_closest_part() {
        let engine = PlanarEngine::default();
        let zone = MultiPolygon::new(vec![
            square(0.0, 0.0, 10.0).0.remove(0),
            square(100.0, 0.0, 10.0).0.remove(0),
        ]);
        let road = MultiLineString::new(vec![
            line_string![(x: 50.0, y: -10.0), (x: 50.0, y: 20.0)],
            line_string![(x: 113.0, y: 4.0), (x: 113.0, y: 20.0)],
        ]);

        assert_abs_diff_eq!(engine.distance(&zone, &road), 3.0);
    }

    #[test]
    fn touching_is_zero() {
        let engine = PlanarEngine::default();
        let zone = square(0.0, 0.0, 10.0);
        let road = MultiLineString::new(vec![line_string![(x: 10.0, y: 20.0), (x: 10.0, y: 10.0)]]);

        assert_eq!(engine.distance(&zone, &road), 0.0);
    }

    #[test]
    fn empty_road_is_infinitely_far() {
        let engine = PlanarEngine::default();
        let distance = engine.distance(&square(0.0, 0.0, 1.0), &MultiLineString::new(vec![]));
        assert!(distance.is_infinite());
    }

    #[test]
    fn reproject_same_crs_keeps_geometry() {
        let engine = PlanarEngine::default();
        let crs = Crs::utm(35, true).unwrap();
        let geometry: Geometry = square(500_000.0, 9_600_000.0, 50.0).into();

        assert_eq!(engine.reproject(&geometry, &crs, &crs).unwrap(), geometry);
    }

    #[test]
    fn reproject_reports_failed_geometry() {
        let engine = PlanarEngine::default();
        let geometries: Vec<Geometry> = vec![
            point!(x: 30.0, y: -3.0).into(),
            point!(x: f64::NAN, y: 0.0).into(),
        ];

        let result = engine
            .reproject_many(&geometries, &Crs::WGS84, &Crs::EPSG3857)
            .unwrap();
        assert_matches!(result[0], Ok(Geometry::Point(_)));
        assert_matches!(result[1], Err(CanopyError::Projection(_)));
    }
}
