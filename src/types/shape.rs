// src/types/shape.rs

use geo::{
    BoundingRect, Contains, Coord, Geometry, Intersects, LineString, MultiPolygon, Point, Polygon,
    Rect, Simplify,
};

/// Einteilige Geometrie nach der Zerlegung: Punkt, Linie oder Polygon mit genau einem Ring.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Point<f64>),
    LineString(LineString<f64>),
    /// Nur der äußere Ring, Löcher sind bereits entfernt.
    Polygon(Polygon<f64>),
}

impl Shape {
    /// Koordinatenfolge der Form: Punkt als Einzelwert, Linie komplett, Polygon als äußerer Ring.
    pub fn ring(&self) -> &[Coord<f64>] {
        match self {
            Shape::Point(point) => std::slice::from_ref(&point.0),
            Shape::LineString(line) => &line.0,
            Shape::Polygon(polygon) => &polygon.exterior().0,
        }
    }

    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            Shape::Point(point) => Geometry::Point(*point),
            Shape::LineString(line) => Geometry::LineString(line.clone()),
            Shape::Polygon(polygon) => Geometry::Polygon(polygon.clone()),
        }
    }

    /// Ramer-Douglas-Peucker; Punkte bleiben unverändert.
    pub fn simplify(&self, tolerance: f64) -> Shape {
        match self {
            Shape::Point(point) => Shape::Point(*point),
            Shape::LineString(line) => Shape::LineString(line.simplify(&tolerance)),
            Shape::Polygon(polygon) => Shape::Polygon(polygon.simplify(&tolerance)),
        }
    }

    pub fn intersects_cell(&self, cell: &Polygon<f64>) -> bool {
        match self {
            Shape::Point(point) => cell.intersects(point),
            Shape::LineString(line) => cell.intersects(line),
            Shape::Polygon(polygon) => cell.intersects(polygon),
        }
    }

    /// Punkt liegt auf oder in der Form (auch auf dem Rand).
    pub fn touches_point(&self, point: &Point<f64>) -> bool {
        match self {
            Shape::Point(own) => own.intersects(point),
            Shape::LineString(line) => line.intersects(point),
            Shape::Polygon(polygon) => polygon.intersects(point),
        }
    }

    pub fn is_within(&self, cell: &MultiPolygon<f64>) -> bool {
        match self {
            Shape::Point(point) => cell.contains(point),
            Shape::LineString(line) => cell.contains(line),
            Shape::Polygon(polygon) => cell.contains(polygon),
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Shape::Point(point) => Some(point.bounding_rect()),
            Shape::LineString(line) => line.bounding_rect(),
            Shape::Polygon(polygon) => polygon.bounding_rect(),
        }
    }
}

/// Eine zerlegte Eingabegeometrie mit ihrem Besitzer-Slot in der Ausgabe.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleFeature {
    /// Position in der zerlegten Liste (Besitzer-Index).
    pub index: usize,
    /// Index des ursprünglichen Eingabe-Features.
    pub source: usize,
    pub shape: Shape,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, polygon};

    #[test]
    fn test_ring_of_each_kind() {
        let point = Shape::Point(Point::new(1.0, 2.0));
        assert_eq!(point.ring(), &[Coord { x: 1.0, y: 2.0 }]);

        let line = Shape::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]);
        assert_eq!(line.ring().len(), 2);

        let square = Shape::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]);
        // polygon! schließt den Ring automatisch
        assert_eq!(square.ring().len(), 5);
    }

    #[test]
    fn test_touches_point_on_boundary() {
        let square = Shape::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ]);

        assert!(square.touches_point(&Point::new(1.0, 1.0)));
        assert!(square.touches_point(&Point::new(2.0, 1.0)));
        assert!(!square.touches_point(&Point::new(3.0, 1.0)));
    }

    #[test]
    fn test_is_within_multipolygon() {
        let cell = MultiPolygon::new(vec![polygon![
            (x: -1.0, y: -1.0),
            (x: 3.0, y: -1.0),
            (x: 3.0, y: 3.0),
            (x: -1.0, y: 3.0),
        ]]);
        let inside = Shape::LineString(line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 2.0)]);
        let crossing = Shape::LineString(line_string![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0)]);

        assert!(inside.is_within(&cell));
        assert!(!crossing.is_within(&cell));
    }

    #[test]
    fn test_simplify_removes_collinear_vertex() {
        let line = Shape::LineString(line_string![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 2.0, y: 0.0),
        ]);

        let simplified = line.simplify(0.0001);
        assert_eq!(simplified.ring().len(), 2);
    }
}
