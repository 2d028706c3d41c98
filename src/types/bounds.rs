// src/types/bounds.rs

use geo::{Coord, LineString, Polygon, Rect};
use std::fmt;

/// 2D Bounding Box (Axis-Aligned Bounding Box) in Eingabekoordinaten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Coord<f64>,
    pub max: Coord<f64>,
}

impl Bounds2D {
    /// Erstellt eine Bounding Box aus zwei beliebigen Punkten
    pub fn from_points(p1: Coord<f64>, p2: Coord<f64>) -> Self {
        Self {
            min: Coord {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
            },
            max: Coord {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
            },
        }
    }

    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self {
            min: rect.min(),
            max: rect.max(),
        }
    }

    /// Vereinigung mehrerer Rechtecke; `None` für eine leere Sammlung.
    pub fn from_rects<I>(rects: I) -> Option<Self>
    where
        I: IntoIterator<Item = Rect<f64>>,
    {
        rects
            .into_iter()
            .map(Self::from_rect)
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    /// Breite der Bounding Box
    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    /// Höhe der Bounding Box
    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    /// Zentrum der Bounding Box
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min.x + self.max.x) * 0.5,
            y: (self.min.y + self.max.y) * 0.5,
        }
    }

    /// Vereinigt zwei Bounding Boxes
    pub fn union(&self, other: &Bounds2D) -> Self {
        Self {
            min: Coord {
                x: self.min.x.min(other.min.x),
                y: self.min.y.min(other.min.y),
            },
            max: Coord {
                x: self.max.x.max(other.max.x),
                y: self.max.y.max(other.max.y),
            },
        }
    }

    /// Erweitert die Bounding Box um einen Margin
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: Coord {
                x: self.min.x - margin,
                y: self.min.y - margin,
            },
            max: Coord {
                x: self.max.x + margin,
                y: self.max.y + margin,
            },
        }
    }

    /// Erweitert um `fraction` der kleineren Seitenlänge (Breite oder Höhe).
    ///
    /// Ist eine Seite 0 (kollineare oder einzelne Punkte), zählt die größere
    /// Seite, bei einer Box ohne Ausdehnung 1.0. Das Ergebnis hat immer Fläche.
    pub fn extend_by_fraction(&self, fraction: f64) -> Self {
        let (short, long) = (
            self.width().min(self.height()),
            self.width().max(self.height()),
        );
        let base = if short > 0.0 {
            short
        } else if long > 0.0 {
            long
        } else {
            1.0
        };
        self.expand(base * fraction)
    }

    /// Erzeugt die vier Eckpunkte der Bounding Box
    pub fn corners(&self) -> [Coord<f64>; 4] {
        [
            self.min,                               // unten links
            Coord { x: self.max.x, y: self.min.y }, // unten rechts
            self.max,                               // oben rechts
            Coord { x: self.min.x, y: self.max.y }, // oben links
        ]
    }

    /// Geschlossener Ring gegen den Uhrzeigersinn als Polygon ohne Löcher.
    pub fn to_polygon(&self) -> Polygon<f64> {
        let mut ring = self.corners().to_vec();
        ring.push(self.min);
        Polygon::new(LineString::new(ring), Vec::new())
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bounds2D([{}, {}] to [{}, {}])",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}
