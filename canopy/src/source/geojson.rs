use crate::error::{CanopyError, GeometryWarning};
use crate::layer::{Feature, Layer, LayerKind, Layers, Road, Tree, Zone};
use crate::source::{LayerSource, LoadedLayers};
use canopy_types::geo::Crs;
use geo_types::{Coord, Geometry, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use geojson::feature::Id;
use geojson::{GeoJson, JsonObject, LineStringType, PolygonType, Position, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Feature that can be created from a GeoJSON geometry.
pub trait GeoJsonFeature: Feature {
    /// Creates features from the geometry. One GeoJSON feature can produce several features.
    fn from_geojson(id: &str, value: &Value) -> Result<Vec<Self>, String>;
}

fn coord(position: &Position) -> Result<Coord, String> {
    match position.as_slice() {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(format!("position has {} coordinates", position.len())),
    }
}

fn line_string(line: &LineStringType) -> Result<LineString, String> {
    Ok(LineString::new(
        line.iter().map(coord).collect::<Result<Vec<_>, _>>()?,
    ))
}

fn polygon(polygon: &PolygonType) -> Result<Polygon, String> {
    let mut rings = polygon.iter().map(line_string);
    let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(vec![]));
    Ok(Polygon::new(exterior, rings.collect::<Result<Vec<_>, _>>()?))
}

fn unexpected(value: &Value, expected: &str) -> String {
    let actual = match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    };
    format!("expected {expected}, got {actual}")
}

impl GeoJsonFeature for Tree {
    fn from_geojson(id: &str, value: &Value) -> Result<Vec<Self>, String> {
        match value {
            Value::Point(position) => Ok(vec![Tree::new(id, Point(coord(position)?))]),
            Value::MultiPoint(positions) if positions.len() == 1 => {
                Ok(vec![Tree::new(id, Point(coord(&positions[0])?))])
            }
            Value::MultiPoint(positions) => positions
                .iter()
                .enumerate()
                .map(|(n, position)| Ok(Tree::new(format!("{id}#{n}"), Point(coord(position)?))))
                .collect(),
            other => Err(unexpected(other, "Point or MultiPoint")),
        }
    }
}

impl GeoJsonFeature for Zone {
    fn from_geojson(id: &str, value: &Value) -> Result<Vec<Self>, String> {
        let geometry = match value {
            Value::Polygon(p) => MultiPolygon::new(vec![polygon(p)?]),
            Value::MultiPolygon(mp) => {
                MultiPolygon::new(mp.iter().map(polygon).collect::<Result<Vec<_>, _>>()?)
            }
            other => return Err(unexpected(other, "Polygon or MultiPolygon")),
        };

        Ok(vec![Zone::new(id, geometry)])
    }
}

impl GeoJsonFeature for Road {
    fn from_geojson(id: &str, value: &Value) -> Result<Vec<Self>, String> {
        let geometry = match value {
            Value::LineString(line) => MultiLineString::new(vec![line_string(line)?]),
            Value::MultiLineString(lines) => MultiLineString::new(
                lines.iter().map(line_string).collect::<Result<Vec<_>, _>>()?,
            ),
            other => return Err(unexpected(other, "LineString or MultiLineString")),
        };

        Ok(vec![Road::new(id, geometry)])
    }
}

/// Reads the CRS from the legacy `crs` member: `{"type": "name", "properties": {"name": "EPSG:4326"}}`.
fn declared_crs(foreign_members: Option<&JsonObject>) -> Result<Option<Crs>, CanopyError> {
    let Some(crs) = foreign_members.and_then(|members| members.get("crs")) else {
        return Ok(None);
    };

    let name = crs
        .get("properties")
        .and_then(|properties| properties.get("name"))
        .and_then(|name| name.as_str())
        .ok_or_else(|| CanopyError::Decoding(format!("unsupported `crs` member: {crs}")))?;

    Ok(Some(name.parse::<Crs>()?))
}

fn feature_id(
    properties: Option<&JsonObject>,
    id: Option<&Id>,
    id_property: Option<&str>,
    index: usize,
) -> String {
    let from_property = id_property
        .and_then(|name| properties?.get(name))
        .and_then(|value| match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

    from_property
        .or_else(|| match id {
            Some(Id::String(s)) => Some(s.clone()),
            Some(Id::Number(n)) => Some(n.to_string()),
            None => None,
        })
        .unwrap_or_else(|| index.to_string())
}

/// Parses a GeoJSON document into a layer.
///
/// The CRS is taken from the `crs` member of the feature collection, or is `fallback_crs` if there is no such member.
/// Identifiers are taken from the `id_property` of the feature properties, then from the feature `id`, and finally the
/// index of the feature in the collection is used. Features with unexpected geometry are skipped with a warning.
pub fn parse_layer<F: GeoJsonFeature>(
    json: &str,
    id_property: Option<&str>,
    fallback_crs: Option<&Crs>,
) -> Result<(Layer<F>, Vec<GeometryWarning>), CanopyError> {
    let geojson = json
        .parse::<GeoJson>()
        .map_err(|err| CanopyError::Decoding(err.to_string()))?;

    let (features, foreign_members) = match geojson {
        GeoJson::FeatureCollection(collection) => (collection.features, collection.foreign_members),
        GeoJson::Feature(feature) => (vec![feature], None),
        GeoJson::Geometry(_) => {
            return Err(CanopyError::Decoding(
                "expected a feature collection, got a bare geometry".into(),
            ))
        }
    };

    let crs = declared_crs(foreign_members.as_ref())?.or_else(|| fallback_crs.cloned());

    let mut warnings = vec![];
    let mut result: Vec<F> = Vec::with_capacity(features.len());
    let mut seen = HashSet::new();
    for (index, feature) in features.iter().enumerate() {
        let id = feature_id(
            feature.properties.as_ref(),
            feature.id.as_ref(),
            id_property,
            index,
        );

        let parsed = match &feature.geometry {
            Some(geometry) => F::from_geojson(&id, &geometry.value),
            None => Err("feature has no geometry".to_string()),
        };

        match parsed {
            Ok(parsed) => {
                for feature in parsed {
                    let geometry: Geometry = feature.geometry().clone().into();
                    let mut bits = vec![];
                    push_geometry_bits(&geometry, &mut bits);
                    if seen.insert((feature.id().to_string(), bits)) {
                        result.push(feature);
                    } else {
                        log::debug!("Dropping duplicate {} feature `{}`", F::KIND, feature.id());
                    }
                }
            }
            Err(reason) => {
                let warning = GeometryWarning::new(F::KIND, id, reason);
                log::warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    log::info!("Read {} {} features", result.len(), F::KIND);

    let layer = match crs {
        Some(crs) => Layer::new(result, crs),
        None => Layer::without_crs(result),
    };

    Ok((layer, warnings))
}

fn push_coord_bits(coords: &[Coord], bits: &mut Vec<u64>) {
    bits.push(coords.len() as u64);
    for c in coords {
        bits.push(c.x.to_bits());
        bits.push(c.y.to_bits());
    }
}

fn push_polygon_bits(polygon: &Polygon, bits: &mut Vec<u64>) {
    push_coord_bits(&polygon.exterior().0, bits);
    bits.push(polygon.interiors().len() as u64);
    for ring in polygon.interiors() {
        push_coord_bits(&ring.0, bits);
    }
}

/// Exact coordinate values of the geometry together with its part structure.
fn push_geometry_bits(geometry: &Geometry, bits: &mut Vec<u64>) {
    match geometry {
        Geometry::Point(p) => push_coord_bits(&[p.0], bits),
        Geometry::Line(line) => push_coord_bits(&[line.start, line.end], bits),
        Geometry::LineString(line) => push_coord_bits(&line.0, bits),
        Geometry::Polygon(polygon) => push_polygon_bits(polygon, bits),
        Geometry::MultiPoint(points) => {
            let coords: Vec<Coord> = points.0.iter().map(|p| p.0).collect();
            push_coord_bits(&coords, bits);
        }
        Geometry::MultiLineString(lines) => {
            bits.push(lines.0.len() as u64);
            for line in &lines.0 {
                push_coord_bits(&line.0, bits);
            }
        }
        Geometry::MultiPolygon(polygons) => {
            bits.push(polygons.0.len() as u64);
            for polygon in &polygons.0 {
                push_polygon_bits(polygon, bits);
            }
        }
        Geometry::GeometryCollection(collection) => {
            bits.push(collection.0.len() as u64);
            for geometry in &collection.0 {
                push_geometry_bits(geometry, bits);
            }
        }
        Geometry::Rect(rect) => push_coord_bits(&[rect.min(), rect.max()], bits),
        Geometry::Triangle(triangle) => push_coord_bits(&triangle.to_array(), bits),
    }
}

/// Reads the layers from three GeoJSON files.
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    trees: PathBuf,
    zones: PathBuf,
    roads: PathBuf,
    tree_id_property: Option<String>,
    zone_id_property: Option<String>,
    road_id_property: Option<String>,
    fallback_crs: Option<Crs>,
}

impl GeoJsonSource {
    /// Default property holding the zone identifier.
    pub const ZONE_ID_PROPERTY: &'static str = "designation";

    /// Creates a new source.
    pub fn new(trees: impl Into<PathBuf>, zones: impl Into<PathBuf>, roads: impl Into<PathBuf>) -> Self {
        Self {
            trees: trees.into(),
            zones: zones.into(),
            roads: roads.into(),
            tree_id_property: None,
            zone_id_property: Some(Self::ZONE_ID_PROPERTY.to_string()),
            road_id_property: None,
            fallback_crs: None,
        }
    }

    /// Sets the property to take feature identifiers from for the given layer.
    pub fn with_id_property(mut self, layer: LayerKind, property: impl Into<String>) -> Self {
        let property = Some(property.into());
        match layer {
            LayerKind::Trees => self.tree_id_property = property,
            LayerKind::Zones => self.zone_id_property = property,
            LayerKind::Roads => self.road_id_property = property,
        }
        self
    }

    /// Sets the CRS of the files that do not declare one.
    pub fn with_fallback_crs(mut self, crs: Crs) -> Self {
        self.fallback_crs = Some(crs);
        self
    }

    fn read<F: GeoJsonFeature>(
        &self,
        path: &Path,
        id_property: Option<&str>,
        warnings: &mut Vec<GeometryWarning>,
    ) -> Result<Layer<F>, CanopyError> {
        log::debug!("Reading {} from {}", F::KIND, path.display());
        let json = std::fs::read_to_string(path)?;
        let (layer, mut layer_warnings) =
            parse_layer(&json, id_property, self.fallback_crs.as_ref())?;
        warnings.append(&mut layer_warnings);

        Ok(layer)
    }
}

impl LayerSource for GeoJsonSource {
    fn load_layers(&self) -> Result<LoadedLayers, CanopyError> {
        let mut warnings = vec![];
        let trees = self.read(&self.trees, self.tree_id_property.as_deref(), &mut warnings)?;
        let zones = self.read(&self.zones, self.zone_id_property.as_deref(), &mut warnings)?;
        let roads = self.read(&self.roads, self.road_id_property.as_deref(), &mut warnings)?;

        Ok(LoadedLayers {
            layers: Layers::new(trees, zones, roads),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TREES: &str = r#"{
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::4326"}},
        "features": [
            {"type": "Feature", "id": "p1", "properties": {}, "geometry": {"type": "Point", "coordinates": [27.1, -3.2]}},
            {"type": "Feature", "id": "p1", "properties": {}, "geometry": {"type": "Point", "coordinates": [27.1, -3.2]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "MultiPoint", "coordinates": [[27.0, -3.0], [27.5, -3.5]]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[27.0, -3.0], [27.5, -3.5]]}},
            {"type": "Feature", "properties": {}, "geometry": null}
        ]
    }"#;

    #[test]
    fn trees_are_read() {
        let (layer, warnings) = parse_layer::<Tree>(TREES, None, None).unwrap();

        assert_eq!(layer.crs(), Some(&Crs::WGS84));
        let ids: Vec<&str> = layer.features().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "2#0", "2#1"]);

        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].feature_id, "3");
        assert_eq!(warnings[0].reason, "expected Point or MultiPoint, got LineString");
        assert_eq!(warnings[1].reason, "feature has no geometry");
    }

    #[test]
    fn duplicates_need_same_id_and_coordinates() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": "a", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
            {"type": "Feature", "id": "a", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
            {"type": "Feature", "id": "a", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 2.5]}},
            {"type": "Feature", "id": "b", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}
        ]}"#;

        let (layer, warnings) = parse_layer::<Tree>(json, None, Some(&Crs::WGS84)).unwrap();
        assert!(warnings.is_empty());
        let trees: Vec<(&str, f64)> = layer
            .features()
            .iter()
            .map(|t| (t.id.as_str(), t.location.y()))
            .collect();
        assert_eq!(trees, vec![("a", 2.0), ("a", 2.5), ("b", 2.0)]);
    }

    #[test]
    fn part_structure_tells_roads_apart() {
        let mut single = vec![];
        push_geometry_bits(
            &Geometry::MultiLineString(MultiLineString::new(vec![LineString::from(vec![
                (0.0, 0.0),
                (1.0, 0.0),
                (2.0, 0.0),
                (3.0, 0.0),
            ])])),
            &mut single,
        );

        let mut split = vec![];
        push_geometry_bits(
            &Geometry::MultiLineString(MultiLineString::new(vec![
                LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
                LineString::from(vec![(2.0, 0.0), (3.0, 0.0)]),
            ])),
            &mut split,
        );

        assert_ne!(single, split);
    }

    #[test]
    fn zone_ids_come_from_property() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": 7, "properties": {"designation": "Mutwanga"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}},
                {"type": "Feature", "id": 8, "properties": {"designation": null},
                 "geometry": {"type": "MultiPolygon", "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]], [[[5, 5], [6, 5], [6, 6], [5, 5]]]]}}
            ]
        }"#;

        let (layer, warnings) =
            parse_layer::<Zone>(json, Some("designation"), Some(&Crs::EPSG3857)).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(layer.crs(), Some(&Crs::EPSG3857));
        assert_eq!(layer.features()[0].id, "Mutwanga");
        assert_eq!(layer.features()[1].id, "8");
        assert_eq!(layer.features()[1].geometry.0.len(), 2);
    }

    #[test]
    fn missing_crs_is_kept_missing() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}
        ]}"#;

        let (layer, _) = parse_layer::<Road>(json, None, None).unwrap();
        assert!(layer.crs().is_none());
        assert_eq!(layer.features()[0].id, "0");
    }

    #[test]
    fn invalid_documents() {
        assert_matches!(parse_layer::<Road>("{", None, None), Err(CanopyError::Decoding(_)));
        assert_matches!(
            parse_layer::<Road>(r#"{"type": "Point", "coordinates": [0, 0]}"#, None, None),
            Err(CanopyError::Decoding(_))
        );

        let unsupported = r#"{"type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "EPSG:2154"}}, "features": []}"#;
        assert_matches!(
            parse_layer::<Road>(unsupported, None, None),
            Err(CanopyError::Projection(_))
        );
    }
}
