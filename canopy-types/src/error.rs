//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CanopyTypesError {
    /// The string does not name a coordinate system.
    #[error("invalid CRS identifier: {0}")]
    InvalidCrs(String),
    /// The coordinate system is known but there is no projection available for it.
    #[error("unsupported CRS: {0}")]
    UnsupportedCrs(String),
    /// Projection could not be initialized or applied.
    #[error("projection failed: {0}")]
    Projection(String),
}
