// src/partition/decompose.rs

use crate::error::{PartitionError, PartitionResult};
use crate::types::{Shape, SimpleFeature};
use geo::{Geometry, Polygon};
use tracing::debug;

pub(crate) fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Nur der äußere Ring bleibt erhalten.
fn strip_holes(polygon: &Polygon<f64>) -> Polygon<f64> {
    Polygon::new(polygon.exterior().clone(), Vec::new())
}

/// Zerlegt Eingabegeometrien in einteilige Formen.
///
/// Multi-Geometrien werden in ihre Teile aufgespalten, Polygone verlieren
/// ihre Löcher. Linien und Polygone werden anschließend mit `tolerance`
/// vereinfacht (0 = keine Vereinfachung). Die Reihenfolge der Ausgabe folgt
/// der Eingabe, Teile einer Multi-Geometrie liegen direkt hintereinander.
pub fn decompose(
    geometries: &[Geometry<f64>],
    tolerance: f64,
) -> PartitionResult<Vec<SimpleFeature>> {
    let mut shapes: Vec<(usize, Shape)> = Vec::new();

    for (source, geometry) in geometries.iter().enumerate() {
        match geometry {
            Geometry::Point(point) => shapes.push((source, Shape::Point(*point))),
            Geometry::LineString(line) => shapes.push((source, Shape::LineString(line.clone()))),
            Geometry::Polygon(polygon) => {
                shapes.push((source, Shape::Polygon(strip_holes(polygon))))
            }
            Geometry::MultiPoint(points) => {
                shapes.extend(points.iter().map(|point| (source, Shape::Point(*point))))
            }
            Geometry::MultiLineString(lines) => shapes.extend(
                lines
                    .iter()
                    .map(|line| (source, Shape::LineString(line.clone()))),
            ),
            Geometry::MultiPolygon(polygons) => shapes.extend(
                polygons
                    .iter()
                    .map(|polygon| (source, Shape::Polygon(strip_holes(polygon)))),
            ),
            other => {
                return Err(PartitionError::UnsupportedGeometry {
                    kind: geometry_kind(other).to_string(),
                });
            }
        }
    }

    let features: Vec<SimpleFeature> = shapes
        .into_iter()
        .enumerate()
        .map(|(index, (source, shape))| SimpleFeature {
            index,
            source,
            shape: if tolerance > 0.0 {
                shape.simplify(tolerance)
            } else {
                shape
            },
        })
        .collect();

    debug!(
        "Decomposed {} input geometries into {} simple features",
        geometries.len(),
        features.len()
    );

    Ok(features)
}
