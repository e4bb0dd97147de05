/// Reference ellipsoid of a coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// World Geodetic System 1984.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Creates a custom datum.
    pub fn new(semimajor: f64, inv_flattening: f64) -> Self {
        Self {
            semimajor,
            inv_flattening,
        }
    }

    /// Semimajor axis of the ellipsoid in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening of the ellipsoid.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Ellipsoid definition in the form understood by `geodesy` operator parameters.
    pub fn ellps(&self) -> String {
        if *self == Self::WGS84 {
            "WGS84".to_string()
        } else {
            format!("{},{}", self.semimajor, self.inv_flattening)
        }
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}
