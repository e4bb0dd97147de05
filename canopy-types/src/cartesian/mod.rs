//! Types and functions on geometries in cartesian coordinates.

mod contour;
mod orient;
mod point;
mod polygon;
mod rect;
mod segment;

pub use contour::CartesianContour;
pub use orient::Orientation;
pub use point::{CartesianPoint2d, NewCartesianPoint2d};
pub use polygon::{CartesianPolygon, PointLocation};
pub use rect::{BoundingRect, Rect};
pub use segment::Segment;
