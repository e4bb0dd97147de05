//! Implementations for some of the common projections.
mod identity;
mod web_mercator;

pub use identity::{CartesianSpace, GeoSpace, IdentityProjection};
pub use web_mercator::WebMercator;

#[cfg(feature = "geodesy")]
mod geodesy;
#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyProjection;
