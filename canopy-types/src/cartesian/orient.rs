use crate::cartesian::CartesianPoint2d;
use serde::{Deserialize, Serialize};

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    ///
    /// Non-finite coordinates give [`Orientation::Collinear`], since no turn can be determined for them.
    pub fn triplet<N: num_traits::Float>(
        p: &impl CartesianPoint2d<Num = N>,
        q: &impl CartesianPoint2d<Num = N>,
        r: &impl CartesianPoint2d<Num = N>,
    ) -> Self {
        match (q.y() - p.y()) * (r.x() - q.x()) - (q.x() - p.x()) * (r.y() - q.y()) {
            v if v > N::zero() => Self::Clockwise,
            v if v < N::zero() => Self::Counterclockwise,
            _ => Self::Collinear,
        }
    }
}
