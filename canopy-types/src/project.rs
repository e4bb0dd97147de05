use crate::geo::Projection;
use geo_types::{
    Coord, Geometry, GeometryCollection, Line, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Rect, Triangle,
};

/// Geometry that can be converted into another coordinate system.
///
/// Projection is applied to every vertex of every part. The structure of the geometry (number and order of parts,
/// rings and vertices) does not change. If any of the vertices cannot be projected, the whole geometry fails.
pub trait Project: Sized {
    /// Type of the projected geometry.
    type Output;

    /// Projects the geometry. `None` if at least one vertex cannot be projected.
    fn project<Proj>(&self, projection: &Proj) -> Option<Self::Output>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized;
}

impl Project for Coord {
    type Output = Coord;

    fn project<Proj>(&self, projection: &Proj) -> Option<Coord>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        projection.project(self)
    }
}

impl Project for Point {
    type Output = Point;

    fn project<Proj>(&self, projection: &Proj) -> Option<Point>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(Point(projection.project(&self.0)?))
    }
}

impl Project for MultiPoint {
    type Output = MultiPoint;

    fn project<Proj>(&self, projection: &Proj) -> Option<MultiPoint>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(MultiPoint::new(
            self.0
                .iter()
                .map(|p| p.project(projection))
                .collect::<Option<Vec<_>>>()?,
        ))
    }
}

impl Project for Line {
    type Output = Line;

    fn project<Proj>(&self, projection: &Proj) -> Option<Line>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(Line::new(
            projection.project(&self.start)?,
            projection.project(&self.end)?,
        ))
    }
}

impl Project for LineString {
    type Output = LineString;

    fn project<Proj>(&self, projection: &Proj) -> Option<LineString>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(LineString::new(
            self.0
                .iter()
                .map(|c| projection.project(c))
                .collect::<Option<Vec<_>>>()?,
        ))
    }
}

impl Project for MultiLineString {
    type Output = MultiLineString;

    fn project<Proj>(&self, projection: &Proj) -> Option<MultiLineString>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(MultiLineString::new(
            self.0
                .iter()
                .map(|line| line.project(projection))
                .collect::<Option<Vec<_>>>()?,
        ))
    }
}

impl Project for Polygon {
    type Output = Polygon;

    fn project<Proj>(&self, projection: &Proj) -> Option<Polygon>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(Polygon::new(
            self.exterior().project(projection)?,
            self.interiors()
                .iter()
                .map(|ring| ring.project(projection))
                .collect::<Option<Vec<_>>>()?,
        ))
    }
}

impl Project for MultiPolygon {
    type Output = MultiPolygon;

    fn project<Proj>(&self, projection: &Proj) -> Option<MultiPolygon>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(MultiPolygon::new(
            self.0
                .iter()
                .map(|polygon| polygon.project(projection))
                .collect::<Option<Vec<_>>>()?,
        ))
    }
}

// Rectangles and triangles stay axis-aligned/flat only in the source system, so they become polygons.
impl Project for Rect {
    type Output = Polygon;

    fn project<Proj>(&self, projection: &Proj) -> Option<Polygon>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        self.to_polygon().project(projection)
    }
}

impl Project for Triangle {
    type Output = Polygon;

    fn project<Proj>(&self, projection: &Proj) -> Option<Polygon>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        self.to_polygon().project(projection)
    }
}

impl Project for Geometry {
    type Output = Geometry;

    fn project<Proj>(&self, projection: &Proj) -> Option<Geometry>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(match self {
            Geometry::Point(v) => Geometry::Point(v.project(projection)?),
            Geometry::Line(v) => Geometry::Line(v.project(projection)?),
            Geometry::LineString(v) => Geometry::LineString(v.project(projection)?),
            Geometry::Polygon(v) => Geometry::Polygon(v.project(projection)?),
            Geometry::MultiPoint(v) => Geometry::MultiPoint(v.project(projection)?),
            Geometry::MultiLineString(v) => Geometry::MultiLineString(v.project(projection)?),
            Geometry::MultiPolygon(v) => Geometry::MultiPolygon(v.project(projection)?),
            Geometry::GeometryCollection(v) => Geometry::GeometryCollection(GeometryCollection::new_from(
                v.0.iter()
                    .map(|g| g.project(projection))
                    .collect::<Option<Vec<_>>>()?,
            )),
            Geometry::Rect(v) => Geometry::Polygon(v.project(projection)?),
            Geometry::Triangle(v) => Geometry::Polygon(v.project(projection)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Crs;
    use geo_types::{line_string, polygon};

    #[test]
    fn multi_part_structure_is_preserved() {
        let lines = MultiLineString::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)],
            line_string![(x: 2.0, y: 2.0), (x: 3.0, y: 3.0), (x: 4.0, y: 3.0)],
        ]);
        let transform = Crs::WGS84.transform_to(&Crs::EPSG3857).unwrap();

        let projected = lines.project(&*transform).unwrap();
        assert_eq!(projected.0.len(), 2);
        assert_eq!(projected.0[0].0.len(), 2);
        assert_eq!(projected.0[1].0.len(), 3);
        assert!(projected.0[1].0[2].x > projected.0[1].0[1].x);
    }

    #[test]
    fn holes_are_projected() {
        let polygon = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0)]],
        );
        let transform = Crs::WGS84.transform_to(&Crs::EPSG3857).unwrap();

        let projected = polygon.project(&*transform).unwrap();
        assert_eq!(projected.interiors().len(), 1);
        assert_eq!(projected.exterior().0.len(), polygon.exterior().0.len());
    }

    #[test]
    fn failed_vertex_fails_geometry() {
        let line = line_string![(x: 0.0, y: 0.0), (x: f64::NAN, y: 1.0)];
        let transform = Crs::WGS84.transform_to(&Crs::EPSG3857).unwrap();

        assert!(line.project(&*transform).is_none());
    }
}
