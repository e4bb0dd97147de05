use crate::cartesian::{CartesianPoint2d, Segment};
use geo_types::{Coord, CoordFloat, LineString};
use nalgebra::Scalar;
use num_traits::{Float, Zero};
use std::cmp::Ordering;

/// Planar algorithms on a sequence of connected points. This trait is implemented for [`LineString`], which is used
/// both for open lines (roads) and for closed rings of polygons.
pub trait CartesianContour {
    /// Numeric type of the coordinates.
    type Num: CoordFloat + Scalar;

    /// Iterates over segments between consecutive points. If the contour is closed, the last segment ends at the
    /// first point.
    fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Coord<Self::Num>>>;

    /// Smallest squared distance between the point and any of the segments. `None` for contours with less than two
    /// points.
    fn distance_to_point_sq<P>(&self, point: &P) -> Option<Self::Num>
    where
        P: CartesianPoint2d<Num = Self::Num>,
    {
        self.iter_segments()
            .map(|v| v.distance_to_point_sq(point))
            .min_by(move |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    /// Smallest squared distance between any two segments of the contours. Zero if the contours cross or touch.
    fn distance_to_contour_sq(&self, other: &impl CartesianContour<Num = Self::Num>) -> Option<Self::Num> {
        let mut min: Option<Self::Num> = None;
        for segment in self.iter_segments() {
            for other_segment in other.iter_segments() {
                let distance = segment.distance_to_segment_sq(&other_segment);
                if distance == Self::Num::zero() {
                    return Some(distance);
                }

                if min.map_or(true, |m| distance < m) {
                    min = Some(distance);
                }
            }
        }

        min
    }

    /// Total length of the contour.
    fn length(&self) -> Self::Num {
        self.iter_segments()
            .fold(Self::Num::zero(), |acc, s| acc + s.length_sq().sqrt())
    }

    /// Signed area of the closed contour, positive for counterclockwise rings.
    fn area_signed(&self) -> Self::Num;

    /// Returns true if two non-adjacent segments of the contour have a common point, or if two adjacent segments
    /// fold back over each other. Repeated consecutive points are ignored.
    fn has_self_intersection(&self) -> bool;
}

impl<T: CoordFloat + Scalar> CartesianContour for LineString<T> {
    type Num = T;

    fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Coord<T>>> {
        self.0.windows(2).map(|w| Segment(&w[0], &w[1]))
    }

    fn area_signed(&self) -> T {
        let mut iter = self.0.iter();
        let Some(mut prev) = iter.next() else {
            return T::zero();
        };

        let mut aggr = T::zero();
        for p in iter {
            aggr = aggr + prev.x * p.y - p.x * prev.y;
            prev = p;
        }

        aggr / (T::one() + T::one())
    }

    fn has_self_intersection(&self) -> bool {
        let mut points: Vec<&Coord<T>> = Vec::with_capacity(self.0.len());
        for p in &self.0 {
            if points.last().map_or(true, |last| !last.equal(p)) {
                points.push(p);
            }
        }

        let segments: Vec<_> = points.windows(2).map(|w| Segment(w[0], w[1])).collect();
        let closed = segments.len() > 2 && points.first().map(|p| **p) == points.last().map(|p| **p);
        let count = segments.len();

        for i in 0..count {
            for j in i + 1..count {
                let adjacent = j == i + 1 || (closed && i == 0 && j == count - 1);
                if adjacent {
                    if folds_back(&segments[i], &segments[j]) {
                        return true;
                    }
                } else if segments[i].intersects(&segments[j]) {
                    return true;
                }
            }
        }

        false
    }
}

/// Adjacent segments share exactly one point unless the second one turns back along the first.
fn folds_back<T: CoordFloat + Scalar>(a: &Segment<Coord<T>>, b: &Segment<Coord<T>>) -> bool {
    let (shared, a_far, b_far) = if a.1.equal(b.0) {
        (a.1, a.0, b.1)
    } else {
        (a.0, a.1, b.0)
    };

    let u = a_far.sub(shared);
    let v = b_far.sub(shared);
    let cross = u.x * v.y - u.y * v.x;
    let dot = u.x * v.x + u.y * v.y;

    cross == T::zero() && dot > T::zero()
}
