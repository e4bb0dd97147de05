use crate::cartesian::CartesianPoint2d;
use geo_types::{CoordFloat, LineString, MultiLineString, MultiPolygon, Polygon};
use nalgebra::Scalar;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    /// Minimum x coordinate.
    pub x_min: N,
    /// Minimum y coordinate.
    pub y_min: N,
    /// Maximum x coordinate.
    pub x_max: N,
    /// Maximum y coordinate.
    pub y_max: N,
}

impl<N: CoordFloat> Rect<N> {
    /// Creates a new rectangle.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Rectangle that contains both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Creates a zero-size rectangle at the point.
    pub fn from_point(p: &impl CartesianPoint2d<Num = N>) -> Self {
        Self {
            x_min: p.x(),
            x_max: p.x(),
            y_min: p.y(),
            y_max: p.y(),
        }
    }

    /// Smallest rectangle containing all the points. `None` if the iterator is empty.
    pub fn from_points<'a, P: CartesianPoint2d<Num = N> + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |rect, p| {
            rect.merge(Self::from_point(p))
        }))
    }

    /// Grows the rectangle by `amount` in every direction.
    pub fn expand(&self, amount: N) -> Self {
        Self {
            x_min: self.x_min - amount,
            x_max: self.x_max + amount,
            y_min: self.y_min - amount,
            y_max: self.y_max + amount,
        }
    }

    /// Corners of the rectangle as `[x, y]` arrays: the lower-left one and the upper-right one.
    pub fn corners(&self) -> ([N; 2], [N; 2]) {
        ([self.x_min, self.y_min], [self.x_max, self.y_max])
    }
}

/// Geometries that have a bounding rectangle.
pub trait BoundingRect {
    /// Numeric type of the coordinates.
    type Num: CoordFloat;

    /// Smallest axis-aligned rectangle containing the geometry. `None` for empty geometries.
    fn bounding_rect(&self) -> Option<Rect<Self::Num>>;
}

fn merge_all<N: CoordFloat>(rects: impl Iterator<Item = Option<Rect<N>>>) -> Option<Rect<N>> {
    rects.flatten().reduce(|a, b| a.merge(b))
}

impl<T: CoordFloat + Scalar> BoundingRect for LineString<T> {
    type Num = T;

    fn bounding_rect(&self) -> Option<Rect<T>> {
        Rect::from_points(self.0.iter())
    }
}

impl<T: CoordFloat + Scalar> BoundingRect for MultiLineString<T> {
    type Num = T;

    fn bounding_rect(&self) -> Option<Rect<T>> {
        merge_all(self.0.iter().map(|line| line.bounding_rect()))
    }
}

impl<T: CoordFloat + Scalar> BoundingRect for Polygon<T> {
    type Num = T;

    fn bounding_rect(&self) -> Option<Rect<T>> {
        // Holes are always inside the exterior ring.
        self.exterior().bounding_rect()
    }
}

impl<T: CoordFloat + Scalar> BoundingRect for MultiPolygon<T> {
    type Num = T;

    fn bounding_rect(&self) -> Option<Rect<T>> {
        merge_all(self.0.iter().map(|polygon| polygon.bounding_rect()))
    }
}
