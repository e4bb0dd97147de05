use crate::cartesian::{CartesianPoint2d, Orientation};
use num_traits::{One, Zero};

/// A strait line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

impl<'a, P: CartesianPoint2d> Segment<'a, P> {
    /// Shortest euclidian distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * if the normal from the point to the segment ends outside of the segment, the returned value is the smaller one
    ///   of the distances between the point and the segment's endpoints
    pub fn distance_to_point_sq<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        point: &Point,
    ) -> P::Num {
        if self.0.equal(self.1) {
            return self.0.distance_sq(point);
        }

        let ds = self.1.sub(self.0);
        let dp = point.sub(self.0);
        let ds_len = ds.x * ds.x + ds.y * ds.y;

        let r = (dp.x * ds.x + dp.y * ds.y) / ds_len;
        if r <= P::Num::zero() {
            self.0.distance_sq(point)
        } else if r >= P::Num::one() {
            self.1.distance_sq(point)
        } else {
            let cross = dp.y * ds.x - dp.x * ds.y;
            cross * cross / ds_len
        }
    }

    /// Shortest euclidian distance (squared) between two segments. Zero if the segments have a common point.
    pub fn distance_to_segment_sq<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        other: &Segment<Point>,
    ) -> P::Num {
        if self.intersects(other) {
            return P::Num::zero();
        }

        let candidates = [
            self.distance_to_point_sq(other.0),
            self.distance_to_point_sq(other.1),
            other.distance_to_point_sq(self.0),
            other.distance_to_point_sq(self.1),
        ];

        candidates
            .into_iter()
            .fold(candidates[0], |min, v| if v < min { v } else { min })
    }

    /// Returns true if the point lies on the segment, including its endpoints.
    pub fn contains_point<Point: CartesianPoint2d<Num = P::Num>>(&self, point: &Point) -> bool {
        Orientation::triplet(self.0, point, self.1) == Orientation::Collinear
            && within_bounds(self.0, point, self.1)
    }

    /// Returns true, if the segment has at least one common point with the `other` segment.
    pub fn intersects<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        other: &Segment<Point>,
    ) -> bool {
        let o1 = Orientation::triplet(self.0, other.0, self.1);
        let o2 = Orientation::triplet(self.0, other.1, self.1);
        let o3 = Orientation::triplet(other.0, self.0, other.1);
        let o4 = Orientation::triplet(other.0, self.1, other.1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        if o1 == Orientation::Collinear && within_bounds(self.0, other.0, self.1) {
            return true;
        }
        if o2 == Orientation::Collinear && within_bounds(self.0, other.1, self.1) {
            return true;
        }
        if o3 == Orientation::Collinear && within_bounds(other.0, self.0, other.1) {
            return true;
        }
        if o4 == Orientation::Collinear && within_bounds(other.0, self.1, other.1) {
            return true;
        }

        false
    }

    /// Squared length of the segment.
    pub fn length_sq(&self) -> P::Num {
        self.0.distance_sq(self.1)
    }
}

/// Checks that `q` lies in the bounding box of the `p`-`r` segment. Only meaningful for collinear points.
fn within_bounds<N: num_traits::Float>(
    p: &impl CartesianPoint2d<Num = N>,
    q: &impl CartesianPoint2d<Num = N>,
    r: &impl CartesianPoint2d<Num = N>,
) -> bool {
    q.x() <= p.x().max(r.x())
        && q.x() >= p.x().min(r.x())
        && q.y() <= p.y().max(r.y())
        && q.y() >= p.y().min(r.y())
}
