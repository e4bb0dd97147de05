//! Geographic coordinates (latitude and longitude, see [`GeoPoint`]) and conversion between different coordinate
//! reference systems (see [`Crs`] and [`Projection`]).

mod crs;
mod datum;
mod point;
mod projection;

pub mod impls;

pub use crs::{Crs, ProjectionType};
pub use datum::Datum;
pub use point::{GeoPoint, NewGeoPoint};
pub use projection::{ChainProjection, InvertedProjection, Projection};
