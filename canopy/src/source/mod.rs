//! Sources of input layers.

use crate::error::{CanopyError, GeometryWarning};
use crate::layer::Layers;

#[cfg(feature = "geojson")]
mod geojson;

#[cfg(feature = "geojson")]
pub use self::geojson::{parse_layer, GeoJsonFeature, GeoJsonSource};

/// Layers read from a source together with the features the source could not interpret.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLayers {
    /// Trees, zones and roads.
    pub layers: Layers,
    /// Features skipped while reading.
    pub warnings: Vec<GeometryWarning>,
}

impl From<Layers> for LoadedLayers {
    fn from(layers: Layers) -> Self {
        Self {
            layers,
            warnings: vec![],
        }
    }
}

/// Provides the three input layers of a scoring run.
pub trait LayerSource {
    /// Reads the layers.
    fn load_layers(&self) -> Result<LoadedLayers, CanopyError>;
}

impl LayerSource for Layers {
    fn load_layers(&self) -> Result<LoadedLayers, CanopyError> {
        Ok(self.clone().into())
    }
}
