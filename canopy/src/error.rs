//! Error types used by the crate.

use crate::layer::LayerKind;
use canopy_types::error::CanopyTypesError;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Canopy error type.
#[derive(Debug, Error)]
pub enum CanopyError {
    /// Layer has no declared coordinate reference system, so it cannot be harmonized.
    #[error("{layer} layer has no coordinate reference system")]
    MissingCrs {
        /// Layer without CRS.
        layer: LayerKind,
    },
    /// Layer contains no features.
    #[error("{layer} layer contains no features")]
    EmptyLayer {
        /// Empty layer.
        layer: LayerKind,
    },
    /// Zone reached the scorer without one of its aggregates.
    #[error("zone `{zone_id}` has no {missing} at scoring time")]
    IncompleteData {
        /// Identifier of the zone.
        zone_id: String,
        /// Name of the missing aggregate.
        missing: &'static str,
    },
    /// Coordinates cannot be converted between the coordinate systems.
    #[error("projection error: {0}")]
    Projection(#[from] CanopyTypesError),
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Input data cannot be decoded.
    #[error("failed to decode data: {0}")]
    Decoding(String),
    /// Error reading data from the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
}

impl From<serde_json::Error> for CanopyError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decoding(value.to_string())
    }
}

/// Problem with a single feature. The feature is excluded from the computation and the run continues.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryWarning {
    /// Layer the feature belongs to.
    pub layer: LayerKind,
    /// Identifier of the feature.
    pub feature_id: String,
    /// What is wrong with the feature.
    pub reason: String,
}

impl GeometryWarning {
    /// Creates a new warning.
    pub fn new(layer: LayerKind, feature_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            layer,
            feature_id: feature_id.into(),
            reason: reason.into(),
        }
    }
}

impl Display for GeometryWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} feature `{}` excluded: {}",
            self.layer, self.feature_id, self.reason
        )
    }
}
