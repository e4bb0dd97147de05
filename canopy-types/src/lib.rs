//! Geometry primitives used by the `canopy` zonal aggregation engine.
//!
//! The crate does not define its own geometry containers. Points, lines and polygons are
//! [`geo_types`] structures, and the traits in this crate add the planar algorithms the engine
//! needs on top of them:
//!
//! * [`cartesian`] - point location in polygons, segment and contour distances, bounding
//!   rectangles and validity checks in projected (planar) coordinates,
//! * [`geo`] - coordinate reference systems ([`Crs`](geo::Crs)) and projections between them,
//! * [`Project`] - applying a projection to a whole geometry, part by part.

pub mod cartesian;
pub mod error;
pub mod geo;

mod project;

pub use project::Project;

pub use geo_types;
