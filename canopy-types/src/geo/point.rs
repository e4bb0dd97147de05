use geo_types::{coord, Coord, CoordFloat, Point};
use num_traits::Float;

/// Point in geographic coordinates, in degrees.
pub trait GeoPoint {
    /// Numeric type of the coordinates.
    type Num: Float;

    /// Latitude.
    fn lat(&self) -> Self::Num;
    /// Longitude.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

/// Geographic point that can be constructed from its coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude.
    fn latlon(lat: N, lon: N) -> Self;

    /// Creates a point from longitude and latitude.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

// `geo_types` stores geographic positions as x = longitude, y = latitude.
impl<T: CoordFloat> GeoPoint for Coord<T> {
    type Num = T;

    fn lat(&self) -> T {
        self.y
    }

    fn lon(&self) -> T {
        self.x
    }
}

impl<T: CoordFloat> NewGeoPoint<T> for Coord<T> {
    fn latlon(lat: T, lon: T) -> Self {
        coord!(x: lon, y: lat)
    }
}

impl<T: CoordFloat> GeoPoint for Point<T> {
    type Num = T;

    fn lat(&self) -> T {
        self.0.y
    }

    fn lon(&self) -> T {
        self.0.x
    }
}

impl<T: CoordFloat> NewGeoPoint<T> for Point<T> {
    fn latlon(lat: T, lon: T) -> Self {
        Point::new(lon, lat)
    }
}
