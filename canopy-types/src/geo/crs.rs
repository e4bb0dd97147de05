use crate::cartesian::NewCartesianPoint2d;
use crate::error::CanopyTypesError;
use crate::geo::datum::Datum;
use crate::geo::impls::{CartesianSpace, GeoSpace, IdentityProjection, WebMercator};
use crate::geo::point::NewGeoPoint;
use crate::geo::projection::{ChainProjection, InvertedProjection, Projection};
use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Coordinate reference system.
///
/// A CRS is a [`Datum`] plus the way geographic coordinates on that datum are mapped onto a plane. The string form
/// (used in configuration files and in GeoJSON `crs` members) is an EPSG code, e.g. `EPSG:32735`, or a `geodesy`
/// operator definition prefixed with `geodesy:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    datum: Datum,
    projection_type: ProjectionType,
}

/// Method of projecting geographic coordinates onto a plane.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProjectionType {
    /// Geographic coordinates, no projection (x = longitude, y = latitude in degrees).
    None,
    /// Web Mercator projection.
    WebMercator,
    /// Universal Transverse Mercator.
    Utm {
        /// UTM zone, 1 to 60.
        zone: u8,
        /// True for the southern hemisphere zones.
        south: bool,
    },
    /// Arbitrary `geodesy` operator definition.
    Other(String),
}

type PlanarProjection = Box<dyn Projection<InPoint = Coord, OutPoint = Coord>>;

impl Crs {
    /// Geographic coordinates on the WGS84 ellipsoid (EPSG:4326).
    pub const WGS84: Crs = Crs {
        datum: Datum::WGS84,
        projection_type: ProjectionType::None,
    };

    /// Web Mercator projection on WGS84 (EPSG:3857).
    pub const EPSG3857: Crs = Crs {
        datum: Datum::WGS84,
        projection_type: ProjectionType::WebMercator,
    };

    /// Creates a new CRS.
    pub fn new(datum: Datum, projection_type: ProjectionType) -> Self {
        Self {
            datum,
            projection_type,
        }
    }

    /// UTM zone on the WGS84 ellipsoid (EPSG:326zz for the north, EPSG:327zz for the south).
    pub fn utm(zone: u8, south: bool) -> Result<Self, CanopyTypesError> {
        if !(1..=60).contains(&zone) {
            return Err(CanopyTypesError::InvalidCrs(format!(
                "UTM zone must be between 1 and 60, got {zone}"
            )));
        }

        Ok(Self::new(Datum::WGS84, ProjectionType::Utm { zone, south }))
    }

    /// CRS from a supported EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self, CanopyTypesError> {
        match code {
            4326 => Ok(Self::WGS84),
            3857 | 900913 => Ok(Self::EPSG3857),
            32601..=32660 => Self::utm((code - 32600) as u8, false),
            32701..=32760 => Self::utm((code - 32700) as u8, true),
            _ => Err(CanopyTypesError::UnsupportedCrs(format!("EPSG:{code}"))),
        }
    }

    /// EPSG code of the CRS, if it has one.
    pub fn epsg(&self) -> Option<u32> {
        if self.datum != Datum::WGS84 {
            return None;
        }

        match self.projection_type {
            ProjectionType::None => Some(4326),
            ProjectionType::WebMercator => Some(3857),
            ProjectionType::Utm { zone, south: false } => Some(32600 + zone as u32),
            ProjectionType::Utm { zone, south: true } => Some(32700 + zone as u32),
            ProjectionType::Other(_) => None,
        }
    }

    /// Datum of the CRS.
    pub fn datum(&self) -> Datum {
        self.datum
    }

    /// Projection type of the CRS.
    pub fn projection_type(&self) -> &ProjectionType {
        &self.projection_type
    }

    /// Returns true if the coordinates are angular (longitude and latitude) rather than planar.
    ///
    /// A `geodesy` definition is planar only if its last map projection step is applied forward. Pipelines made of
    /// other operators (`noop`, `adapt`, `unitconvert`, ...) keep angular coordinates.
    pub fn is_geographic(&self) -> bool {
        match &self.projection_type {
            ProjectionType::None => true,
            ProjectionType::WebMercator | ProjectionType::Utm { .. } => false,
            ProjectionType::Other(definition) => !is_planar_pipeline(definition),
        }
    }

    /// Returns the projection from geographic coordinates on the CRS datum into this CRS.
    pub fn get_projection<In, Out>(
        &self,
    ) -> Result<Box<dyn Projection<InPoint = In, OutPoint = Out>>, CanopyTypesError>
    where
        In: NewGeoPoint + 'static,
        Out: NewCartesianPoint2d + 'static,
    {
        match &self.projection_type {
            ProjectionType::None => Ok(Box::new(IdentityProjection::<In, Out, GeoSpace>::new())),
            ProjectionType::WebMercator => Ok(Box::new(WebMercator::new(self.datum))),
            ProjectionType::Utm { zone, south } => {
                let south = if *south { " south" } else { "" };
                self.geodesy_projection(&format!(
                    "utm zone={zone}{south} ellps={}",
                    self.datum.ellps()
                ))
            }
            ProjectionType::Other(definition) => self.geodesy_projection(definition),
        }
    }

    /// Returns the projection that converts coordinates of this CRS into the `target` CRS.
    ///
    /// If both systems are the same, the returned projection does not change coordinate values at all. Otherwise the
    /// coordinates are unprojected into geographic coordinates first and then projected into the target.
    pub fn transform_to(&self, target: &Crs) -> Result<PlanarProjection, CanopyTypesError> {
        if self == target {
            return Ok(Box::new(IdentityProjection::<Coord, Coord, CartesianSpace>::new()));
        }

        if self.datum != target.datum {
            return Err(CanopyTypesError::UnsupportedCrs(format!(
                "datum shift from {self} to {target}"
            )));
        }

        let source = self.get_projection::<Coord, Coord>()?;
        let target = target.get_projection::<Coord, Coord>()?;

        Ok(Box::new(ChainProjection::new(
            Box::new(InvertedProjection::new(source)),
            target,
        )))
    }

    #[cfg(feature = "geodesy")]
    fn geodesy_projection<In, Out>(
        &self,
        definition: &str,
    ) -> Result<Box<dyn Projection<InPoint = In, OutPoint = Out>>, CanopyTypesError>
    where
        In: NewGeoPoint + 'static,
        Out: NewCartesianPoint2d + 'static,
    {
        Ok(Box::new(crate::geo::impls::GeodesyProjection::new(
            definition,
        )?))
    }

    #[cfg(not(feature = "geodesy"))]
    fn geodesy_projection<In, Out>(
        &self,
        definition: &str,
    ) -> Result<Box<dyn Projection<InPoint = In, OutPoint = Out>>, CanopyTypesError>
    where
        In: NewGeoPoint + 'static,
        Out: NewCartesianPoint2d + 'static,
    {
        Err(CanopyTypesError::UnsupportedCrs(format!(
            "`{definition}` requires the `geodesy` feature"
        )))
    }
}

const MAP_PROJECTIONS: &[&str] = &[
    "btmerc", "laea", "lcc", "merc", "omerc", "tmerc", "utm", "webmerc",
];

fn is_planar_pipeline(definition: &str) -> bool {
    definition
        .split('|')
        .filter_map(|step| {
            let mut tokens = step.split_whitespace();
            let operator = tokens.next()?;
            MAP_PROJECTIONS
                .contains(&operator)
                .then(|| !tokens.any(|token| token == "inv"))
        })
        .last()
        .unwrap_or(false)
}

impl FromStr for Crs {
    type Err = CanopyTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(definition) = s.strip_prefix("geodesy:") {
            return Ok(Self::new(
                Datum::WGS84,
                ProjectionType::Other(definition.trim().to_string()),
            ));
        }

        let upper = s.to_ascii_uppercase();
        if upper == "WGS84" || upper.ends_with("CRS84") {
            return Ok(Self::WGS84);
        }

        // EPSG:4326, EPSG::4326, urn:ogc:def:crs:EPSG::4326, urn:ogc:def:crs:EPSG:6.6:4326
        if upper.starts_with("EPSG:") || upper.starts_with("URN:OGC:DEF:CRS:EPSG:") {
            let code = upper
                .rsplit(':')
                .next()
                .and_then(|v| v.parse::<u32>().ok())
                .ok_or_else(|| CanopyTypesError::InvalidCrs(s.to_string()))?;
            return Self::from_epsg(code);
        }

        Err(CanopyTypesError::InvalidCrs(s.to_string()))
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.projection_type, self.epsg()) {
            (_, Some(code)) => write!(f, "EPSG:{code}"),
            (ProjectionType::Other(definition), None) => write!(f, "geodesy:{definition}"),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl TryFrom<String> for Crs {
    type Error = CanopyTypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(value: Crs) -> Self {
        value.to_string()
    }
}
