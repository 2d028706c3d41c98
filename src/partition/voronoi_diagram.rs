// src/partition/voronoi_diagram.rs

use crate::error::{PartitionError, PartitionResult};
use crate::types::{Bounds2D, Coordinate};
use geo::orient::{Direction, Orient};
use geo::{LineString, Polygon};
use spade::{DelaunayTriangulation, Point2, Triangulation};
use tracing::debug;

pub type SpadePoint = Point2<f64>;

/// Abstand der Hilfs-Sites vom Rahmenzentrum, in halben Rahmengrößen.
pub const SENTINEL_SPREAD: f64 = 10.0;

/// Eine unbearbeitete Voronoi-Zelle, noch ohne Besitzer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCell {
    /// Der Generatorpunkt (Site) der Zelle.
    pub site: Coordinate,
    /// Zellpolygon, Eckpunkte gegen den Uhrzeigersinn.
    pub polygon: Polygon<f64>,
}

/// Extrahiert Voronoi-Zellen aus der Delaunay-Triangulation der Sites.
pub struct VoronoiExtractor;

impl VoronoiExtractor {
    /// Vier Hilfs-Sites weit außerhalb des Rahmens, damit jede echte Zelle beschränkt ist.
    fn sentinels(frame: &Bounds2D) -> [Coordinate; 4] {
        let center = frame.center();
        let half = frame.width().max(frame.height()) * 0.5;
        let half = if half > 0.0 { half } else { 1.0 };
        let spread = half * SENTINEL_SPREAD;

        [
            Coordinate { x: center.x - spread, y: center.y - spread },
            Coordinate { x: center.x + spread, y: center.y - spread },
            Coordinate { x: center.x + spread, y: center.y + spread },
            Coordinate { x: center.x - spread, y: center.y + spread },
        ]
    }

    /// Baut die Triangulation und liefert eine Zelle pro eindeutiger Site.
    ///
    /// `frame` muss alle Sites enthalten; innerhalb des Rahmens entsprechen die
    /// Zellen exakt dem Voronoi-Diagramm der Sites. Doppelte Sites werden zu
    /// einer Zelle zusammengefasst.
    pub fn extract_cells(seeds: &[Coordinate], frame: &Bounds2D) -> PartitionResult<Vec<RawCell>> {
        let sentinels = Self::sentinels(frame);

        let mut triangulation: DelaunayTriangulation<SpadePoint> = DelaunayTriangulation::new();
        for seed in seeds.iter().chain(sentinels.iter()) {
            triangulation.insert(SpadePoint::new(seed.x, seed.y))?;
        }

        let mut cells = Vec::with_capacity(seeds.len());
        for vertex in triangulation.vertices() {
            let position = vertex.position();
            let site = Coordinate {
                x: position.x,
                y: position.y,
            };
            if sentinels.contains(&site) {
                continue;
            }

            let mut ring: Vec<Coordinate> = Vec::new();
            for edge in vertex.out_edges() {
                let Some(face) = edge.face().as_inner() else {
                    return Err(PartitionError::Triangulation {
                        reason: format!("site {:?} lies on the hull of the diagram", site),
                    });
                };
                let center = face.circumcenter();
                ring.push(Coordinate {
                    x: center.x,
                    y: center.y,
                });
            }

            // Kozirkuläre Sites liefern identische Umkreismittelpunkte
            ring.dedup();
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }

            if ring.len() < 3 {
                return Err(PartitionError::Triangulation {
                    reason: format!(
                        "cell of site {:?} has only {} vertices",
                        site,
                        ring.len()
                    ),
                });
            }

            let polygon =
                Polygon::new(LineString::new(ring), Vec::new()).orient(Direction::Default);
            cells.push(RawCell { site, polygon });
        }

        debug!(
            "Extracted {} raw Voronoi cells from {} seeds",
            cells.len(),
            seeds.len()
        );

        Ok(cells)
    }
}
