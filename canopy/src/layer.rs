//! Features and layers the engine works with.
//!
//! A [`Layer`] is a homogeneous collection of one kind of [`Feature`] with the coordinate system its coordinates are
//! given in. Layers are created by a [`LayerSource`](crate::source::LayerSource) or by hand, and are turned into
//! [`HarmonizedLayers`] by the [`Harmonizer`](crate::harmonize::Harmonizer). Aggregation steps only accept harmonized
//! layers, so no distance or containment is ever computed on coordinates in different systems.

use canopy_types::geo::Crs;
use geo_types::{Geometry, MultiLineString, MultiPolygon, Point};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Kind of the features in a layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Tree locations.
    Trees,
    /// Management zones.
    Zones,
    /// Road network.
    Roads,
}

impl Display for LayerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LayerKind::Trees => "trees",
            LayerKind::Zones => "zones",
            LayerKind::Roads => "roads",
        };
        f.write_str(name)
    }
}

/// Feature with an identifier and a geometry of a fixed type.
pub trait Feature: Sized {
    /// Geometry type of the feature.
    type Geom: Clone + Into<Geometry> + TryFrom<Geometry>;

    /// Layer kind this feature belongs to.
    const KIND: LayerKind;

    /// Creates a feature.
    fn from_parts(id: String, geometry: Self::Geom) -> Self;

    /// Identifier of the feature.
    fn id(&self) -> &str;

    /// Geometry of the feature.
    fn geometry(&self) -> &Self::Geom;
}

/// A single tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Identifier.
    pub id: String,
    /// Location of the trunk.
    pub location: Point,
}

/// Management zone. Can consist of several polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// Identifier.
    pub id: String,
    /// Zone area.
    pub geometry: MultiPolygon,
}

/// Road, possibly consisting of several disconnected lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    /// Identifier.
    pub id: String,
    /// Center lines of the road.
    pub geometry: MultiLineString,
}

impl Tree {
    /// Creates a new tree.
    pub fn new(id: impl Into<String>, location: Point) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }
}

impl Zone {
    /// Creates a new zone.
    pub fn new(id: impl Into<String>, geometry: impl Into<MultiPolygon>) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
        }
    }
}

impl Road {
    /// Creates a new road.
    pub fn new(id: impl Into<String>, geometry: impl Into<MultiLineString>) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
        }
    }
}

impl Feature for Tree {
    type Geom = Point;
    const KIND: LayerKind = LayerKind::Trees;

    fn from_parts(id: String, geometry: Point) -> Self {
        Self::new(id, geometry)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn geometry(&self) -> &Point {
        &self.location
    }
}

impl Feature for Zone {
    type Geom = MultiPolygon;
    const KIND: LayerKind = LayerKind::Zones;

    fn from_parts(id: String, geometry: MultiPolygon) -> Self {
        Self::new(id, geometry)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn geometry(&self) -> &MultiPolygon {
        &self.geometry
    }
}

impl Feature for Road {
    type Geom = MultiLineString;
    const KIND: LayerKind = LayerKind::Roads;

    fn from_parts(id: String, geometry: MultiLineString) -> Self {
        Self::new(id, geometry)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn geometry(&self) -> &MultiLineString {
        &self.geometry
    }
}

/// Collection of features of one kind sharing a coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<F> {
    crs: Option<Crs>,
    features: Vec<F>,
}

impl<F: Feature> Layer<F> {
    /// Creates a layer with a declared coordinate system.
    pub fn new(features: Vec<F>, crs: Crs) -> Self {
        Self {
            crs: Some(crs),
            features,
        }
    }

    /// Creates a layer which coordinate system is not known.
    pub fn without_crs(features: Vec<F>) -> Self {
        Self {
            crs: None,
            features,
        }
    }

    /// Sets the coordinate system of the layer. The coordinates are not changed.
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = Some(crs);
        self
    }

    /// Kind of the layer.
    pub fn kind(&self) -> LayerKind {
        F::KIND
    }

    /// Declared coordinate system of the layer.
    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Features of the layer.
    pub fn features(&self) -> &[F] {
        &self.features
    }

    /// Number of features in the layer.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if the layer has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Option<Crs>, Vec<F>) {
        (self.crs, self.features)
    }
}

/// Layer of trees.
pub type TreeLayer = Layer<Tree>;
/// Layer of zones.
pub type ZoneLayer = Layer<Zone>;
/// Layer of roads.
pub type RoadLayer = Layer<Road>;

/// The three input layers of a scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct Layers {
    /// Trees.
    pub trees: TreeLayer,
    /// Zones.
    pub zones: ZoneLayer,
    /// Roads.
    pub roads: RoadLayer,
}

impl Layers {
    /// Creates a new set of layers.
    pub fn new(trees: TreeLayer, zones: ZoneLayer, roads: RoadLayer) -> Self {
        Self {
            trees,
            zones,
            roads,
        }
    }
}

/// Layers reprojected into a single planar coordinate system.
///
/// Can only be created by the [`Harmonizer`](crate::harmonize::Harmonizer).
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonizedLayers {
    crs: Crs,
    trees: Vec<Tree>,
    zones: Vec<Zone>,
    roads: Vec<Road>,
}

impl HarmonizedLayers {
    pub(crate) fn new(crs: Crs, trees: Vec<Tree>, zones: Vec<Zone>, roads: Vec<Road>) -> Self {
        Self {
            crs,
            trees,
            zones,
            roads,
        }
    }

    /// Coordinate system of all features.
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Trees.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Zones.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Roads.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Converts back into plain layers, all of them declaring the harmonized coordinate system.
    pub fn into_layers(self) -> Layers {
        Layers::new(
            Layer::new(self.trees, self.crs.clone()),
            Layer::new(self.zones, self.crs.clone()),
            Layer::new(self.roads, self.crs),
        )
    }
}
