use crate::cartesian::{CartesianContour, CartesianPoint2d, Orientation};
use geo_types::{CoordFloat, LineString, MultiPolygon, Polygon};
use nalgebra::Scalar;
use num_traits::Zero;

/// Position of a point relative to an areal geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PointLocation {
    /// Strictly inside the geometry.
    Inside,
    /// On one of the rings of the geometry (exterior or hole).
    Boundary,
    /// Outside of the geometry, including inside of its holes.
    Outside,
}

/// Polygon in 2d cartesian coordinates. Implemented for [`Polygon`] and [`MultiPolygon`].
pub trait CartesianPolygon {
    /// Numeric type of the coordinates.
    type Num: CoordFloat + Scalar;

    /// Iterates over all rings of the geometry: exteriors and holes of every part.
    fn iter_rings(&self) -> impl Iterator<Item = &'_ LineString<Self::Num>>;

    /// Finds where the point is relative to the polygon.
    fn locate_point<P>(&self, point: &P) -> PointLocation
    where
        P: CartesianPoint2d<Num = Self::Num>;

    /// Returns true if the `point` lies inside the polygon, or on one of its rings when `include_boundary` is set.
    fn contains_point<P>(&self, point: &P, include_boundary: bool) -> bool
    where
        P: CartesianPoint2d<Num = Self::Num>,
    {
        match self.locate_point(point) {
            PointLocation::Inside => true,
            PointLocation::Boundary => include_boundary,
            PointLocation::Outside => false,
        }
    }

    /// Smallest squared distance between the polygon (its interior and its rings) and the line. Zero if the line
    /// touches, crosses or lies inside the polygon. `None` if either of the geometries has no segments.
    fn distance_to_contour_sq(&self, line: &LineString<Self::Num>) -> Option<Self::Num> {
        if line
            .0
            .iter()
            .any(|p| self.locate_point(p) != PointLocation::Outside)
        {
            return Some(Self::Num::zero());
        }

        // With no vertex of the line inside, the line is either crossing a ring or fully outside.
        self.iter_rings()
            .filter_map(|ring| ring.distance_to_contour_sq(line))
            .reduce(|a, b| if b < a { b } else { a })
    }
}

/// Winding number test for a single closed ring, reporting points on the ring as [`PointLocation::Boundary`].
fn locate_in_ring<T, P>(ring: &LineString<T>, point: &P) -> PointLocation
where
    T: CoordFloat + Scalar,
    P: CartesianPoint2d<Num = T>,
{
    let mut wn = 0i64;
    let y = point.y();

    for segment in ring.iter_segments() {
        if segment.contains_point(point) {
            return PointLocation::Boundary;
        }

        if segment.0.y() <= y {
            if segment.1.y() > y
                && Orientation::triplet(segment.0, segment.1, point) == Orientation::Counterclockwise
            {
                wn += 1;
            }
        } else if segment.1.y() <= y
            && Orientation::triplet(segment.0, segment.1, point) == Orientation::Clockwise
        {
            wn -= 1;
        }
    }

    if wn != 0 {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

impl<T: CoordFloat + Scalar> CartesianPolygon for Polygon<T> {
    type Num = T;

    fn iter_rings(&self) -> impl Iterator<Item = &'_ LineString<T>> {
        std::iter::once(self.exterior()).chain(self.interiors().iter())
    }

    fn locate_point<P>(&self, point: &P) -> PointLocation
    where
        P: CartesianPoint2d<Num = T>,
    {
        match locate_in_ring(self.exterior(), point) {
            PointLocation::Inside => {}
            other => return other,
        }

        for hole in self.interiors() {
            match locate_in_ring(hole, point) {
                PointLocation::Inside => return PointLocation::Outside,
                PointLocation::Boundary => return PointLocation::Boundary,
                PointLocation::Outside => {}
            }
        }

        PointLocation::Inside
    }
}

impl<T: CoordFloat + Scalar> CartesianPolygon for MultiPolygon<T> {
    type Num = T;

    fn iter_rings(&self) -> impl Iterator<Item = &'_ LineString<T>> {
        self.0.iter().flat_map(|polygon| polygon.iter_rings())
    }

    fn locate_point<P>(&self, point: &P) -> PointLocation
    where
        P: CartesianPoint2d<Num = T>,
    {
        let mut location = PointLocation::Outside;
        for polygon in &self.0 {
            match polygon.locate_point(point) {
                PointLocation::Inside => return PointLocation::Inside,
                PointLocation::Boundary => location = PointLocation::Boundary,
                PointLocation::Outside => {}
            }
        }

        location
    }
}
