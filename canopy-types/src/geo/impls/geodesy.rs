use crate::cartesian::NewCartesianPoint2d;
use crate::error::CanopyTypesError;
use crate::geo::point::NewGeoPoint;
use crate::geo::projection::Projection;
use geodesy::prelude::*;
use std::marker::PhantomData;

/// Projection backed by a [`geodesy`] operator definition, e.g. `utm zone=35 south ellps=WGS84`.
///
/// Input points are geographic coordinates in degrees, output points are in the units of the operator (meters for
/// all the projections `canopy` uses).
pub struct GeodesyProjection<In, Out> {
    context: Minimal,
    op: OpHandle,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> GeodesyProjection<In, Out> {
    /// Parses the operator definition.
    pub fn new(definition: &str) -> Result<Self, CanopyTypesError> {
        let mut context = Minimal::new();
        let op = context.op(definition).map_err(|err| {
            CanopyTypesError::Projection(format!("invalid definition `{definition}`: {err}"))
        })?;

        Ok(Self {
            context,
            op,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        })
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for GeodesyProjection<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let mut data = [Coor2D::geo(input.lat(), input.lon())];
        self.context.apply(self.op, Fwd, &mut data).ok()?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(Out::new(data[0].0[0], data[0].0[1]))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let mut data = [Coor2D([input.x(), input.y()])];
        self.context.apply(self.op, Inv, &mut data).ok()?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(In::latlon(
            data[0].0[1].to_degrees(),
            data[0].0[0].to_degrees(),
        ))
    }
}
