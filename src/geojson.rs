// src/geojson.rs
//! Minimal GeoJSON schema for the feature shapes this crate reads and writes.
//!
//! Only the geometry kinds the partition accepts are modelled; anything else
//! (e.g. `GeometryCollection`) fails at deserialisation.

use crate::error::{PartitionError, PartitionResult};
use geo::{
    Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use serde::{Deserialize, Serialize};

/// `[x, y]`, optionally followed by further ordinates that are ignored.
pub type Position = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTag {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub tag: FeatureTag,
    pub geometry: GeoJsonGeometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

impl GeoJsonFeature {
    pub fn new(geometry: GeoJsonGeometry) -> Self {
        Self {
            tag: FeatureTag::Feature,
            geometry,
            properties: None,
        }
    }

    pub fn to_geometry(&self) -> PartitionResult<Geometry<f64>> {
        Geometry::try_from(&self.geometry)
    }
}

impl From<&Polygon<f64>> for GeoJsonFeature {
    fn from(polygon: &Polygon<f64>) -> Self {
        GeoJsonFeature::new(GeoJsonGeometry::Polygon {
            coordinates: polygon_positions(polygon),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeatureCollection {
    #[serde(rename = "type")]
    pub tag: CollectionTag,
    pub features: Vec<GeoJsonFeature>,
}

impl GeoJsonFeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self {
            tag: CollectionTag::FeatureCollection,
            features,
        }
    }
}

/// Accepts either a `FeatureCollection` or a bare array of features.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FeatureInput {
    Collection(GeoJsonFeatureCollection),
    List(Vec<GeoJsonFeature>),
}

pub fn parse_features(text: &str) -> PartitionResult<Vec<GeoJsonFeature>> {
    let input: FeatureInput = serde_json::from_str(text)?;
    Ok(match input {
        FeatureInput::Collection(collection) => collection.features,
        FeatureInput::List(features) => features,
    })
}

pub fn parse_feature(text: &str) -> PartitionResult<GeoJsonFeature> {
    Ok(serde_json::from_str(text)?)
}

fn to_coord(position: &Position) -> PartitionResult<Coord<f64>> {
    match position.as_slice() {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(PartitionError::InvalidGeometry {
            reason: format!(
                "position needs at least two values, got {}",
                position.len()
            ),
        }),
    }
}

fn to_line_string(positions: &[Position]) -> PartitionResult<LineString<f64>> {
    positions
        .iter()
        .map(to_coord)
        .collect::<PartitionResult<Vec<_>>>()
        .map(LineString::new)
}

fn to_polygon(rings: &[Vec<Position>]) -> PartitionResult<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first().ok_or_else(|| PartitionError::InvalidGeometry {
        reason: "polygon without rings".to_string(),
    })?;
    let interiors = interiors
        .iter()
        .map(|ring| to_line_string(ring))
        .collect::<PartitionResult<Vec<_>>>()?;
    Ok(Polygon::new(to_line_string(exterior)?, interiors))
}

impl TryFrom<&GeoJsonGeometry> for Geometry<f64> {
    type Error = PartitionError;

    fn try_from(geometry: &GeoJsonGeometry) -> PartitionResult<Self> {
        Ok(match geometry {
            GeoJsonGeometry::Point { coordinates } => Point(to_coord(coordinates)?).into(),
            GeoJsonGeometry::MultiPoint { coordinates } => MultiPoint::new(
                coordinates
                    .iter()
                    .map(|position| to_coord(position).map(Point))
                    .collect::<PartitionResult<Vec<_>>>()?,
            )
            .into(),
            GeoJsonGeometry::LineString { coordinates } => to_line_string(coordinates)?.into(),
            GeoJsonGeometry::MultiLineString { coordinates } => MultiLineString::new(
                coordinates
                    .iter()
                    .map(|line| to_line_string(line))
                    .collect::<PartitionResult<Vec<_>>>()?,
            )
            .into(),
            GeoJsonGeometry::Polygon { coordinates } => to_polygon(coordinates)?.into(),
            GeoJsonGeometry::MultiPolygon { coordinates } => MultiPolygon::new(
                coordinates
                    .iter()
                    .map(|polygon| to_polygon(polygon))
                    .collect::<PartitionResult<Vec<_>>>()?,
            )
            .into(),
        })
    }
}

fn ring_positions(ring: &LineString<f64>) -> Vec<Position> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

fn polygon_positions(polygon: &Polygon<f64>) -> Vec<Vec<Position>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_positions)
        .collect()
}
