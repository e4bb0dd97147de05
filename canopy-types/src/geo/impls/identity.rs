use crate::cartesian::NewCartesianPoint2d;
use crate::geo::point::NewGeoPoint;
use crate::geo::projection::Projection;
use std::marker::PhantomData;

/// Marker of projections between two cartesian spaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct CartesianSpace;

/// Marker of projections from geographic coordinates onto a plane with x = longitude and y = latitude.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoSpace;

/// Projection that keeps coordinate values as they are.
///
/// Used when the source and the target coordinate systems are the same, and as the "projection" of geographic
/// coordinate systems onto themselves.
#[derive(Debug, Default)]
pub struct IdentityProjection<IN, OUT, Space = CartesianSpace> {
    phantom_in: PhantomData<IN>,
    phantom_out: PhantomData<OUT>,
    phantom_space: PhantomData<Space>,
}

impl<IN, OUT, Space> IdentityProjection<IN, OUT, Space> {
    /// Creates a new instance.
    pub fn new() -> Self {
        Self {
            phantom_in: Default::default(),
            phantom_out: Default::default(),
            phantom_space: Default::default(),
        }
    }
}

impl<IN: NewCartesianPoint2d, OUT: NewCartesianPoint2d> Projection
    for IdentityProjection<IN, OUT, CartesianSpace>
{
    type InPoint = IN;
    type OutPoint = OUT;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        Some(OUT::new(input.x(), input.y()))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        Some(IN::new(input.x(), input.y()))
    }
}

impl<IN: NewGeoPoint, OUT: NewCartesianPoint2d> Projection for IdentityProjection<IN, OUT, GeoSpace> {
    type InPoint = IN;
    type OutPoint = OUT;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        Some(OUT::new(input.lon(), input.lat()))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        Some(IN::latlon(input.y(), input.x()))
    }
}
