//! Configuration of a scoring run.

use crate::error::CanopyError;
use canopy_types::geo::{Crs, Datum, ProjectionType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default value of ε, added to the road distance to keep the score finite.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Whether points lying exactly on a zone boundary belong to the zone.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryRule {
    /// Boundary points are counted. A point on an edge shared by two zones counts for both.
    #[default]
    Inclusive,
    /// Only points strictly inside are counted.
    Exclusive,
}

impl BoundaryRule {
    /// Returns true for [`BoundaryRule::Inclusive`].
    pub fn includes_boundary(self) -> bool {
        self == BoundaryRule::Inclusive
    }
}

/// Parameters of a scoring run.
///
/// ```
/// use canopy::config::{BoundaryRule, ScoringConfig};
///
/// let config = ScoringConfig::from_json(r#"{"target_crs": "EPSG:32735", "epsilon": 0.001}"#).unwrap();
/// assert_eq!(config.epsilon(), 0.001);
/// assert_eq!(config.boundary(), BoundaryRule::Inclusive);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    target_crs: Crs,
    epsilon: f64,
    boundary: BoundaryRule,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            // UTM zone 35S
            target_crs: Crs::new(
                Datum::WGS84,
                ProjectionType::Utm {
                    zone: 35,
                    south: true,
                },
            ),
            epsilon: DEFAULT_EPSILON,
            boundary: BoundaryRule::default(),
        }
    }
}

impl ScoringConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON configuration. Missing fields take default values.
    pub fn from_json(json: &str) -> Result<Self, CanopyError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| CanopyError::Configuration(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the JSON configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CanopyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Sets the coordinate system all layers are reprojected into.
    pub fn with_target_crs(mut self, crs: Crs) -> Self {
        self.target_crs = crs;
        self
    }

    /// Sets ε.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the boundary rule for counting trees.
    pub fn with_boundary(mut self, boundary: BoundaryRule) -> Self {
        self.boundary = boundary;
        self
    }

    /// Coordinate system all layers are reprojected into.
    pub fn target_crs(&self) -> &Crs {
        &self.target_crs
    }

    /// Value added to the road distance before dividing.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Boundary rule for counting trees.
    pub fn boundary(&self) -> BoundaryRule {
        self.boundary
    }

    /// Checks that the values can be used for scoring.
    pub fn validate(&self) -> Result<(), CanopyError> {
        if !self.epsilon.is_normal() || self.epsilon < 0.0 {
            return Err(CanopyError::Configuration(format!(
                "epsilon must be a positive normal number, got {}",
                self.epsilon
            )));
        }

        if self.target_crs.is_geographic() {
            return Err(CanopyError::Configuration(format!(
                "target CRS {} is not planar",
                self.target_crs
            )));
        }

        Ok(())
    }
}
