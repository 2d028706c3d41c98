// src/partition/sampler.rs

use crate::error::{PartitionError, PartitionResult};
use crate::types::{Bounds2D, Coordinate, SimpleFeature};
use geo::{BoundingRect, Contains, MultiPolygon, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Einzige Quelle für Zufall in der Pipeline.
pub trait SiteSource {
    /// Gleichverteilter Wert in [0, 1).
    fn next_unit(&mut self) -> f64;
}

/// Adapter für beliebige `rand`-Generatoren.
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Seed aus der Konfiguration oder, falls keiner gesetzt ist, ein zufälliger.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        Self::seeded(seed.unwrap_or_else(rand::random))
    }
}

impl<R: Rng> SiteSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Spielt eine feste Folge von Werten zyklisch ab (für deterministische Tests).
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }
}

impl SiteSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position = (self.position + 1) % self.values.len();
        value
    }
}

/// Bereich, in dem leere Sites gezogen werden.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingRegion {
    Rect(Bounds2D),
    /// Rejection Sampling in der Bounding Box des (Multi-)Polygons.
    Polygon(MultiPolygon<f64>),
}

impl SamplingRegion {
    fn frame(&self) -> Option<Bounds2D> {
        match self {
            SamplingRegion::Rect(bounds) => Some(*bounds),
            SamplingRegion::Polygon(polygon) => polygon.bounding_rect().map(Bounds2D::from_rect),
        }
    }

    fn accepts(&self, point: &Point<f64>) -> bool {
        match self {
            SamplingRegion::Rect(_) => true,
            SamplingRegion::Polygon(polygon) => polygon.contains(point),
        }
    }
}

/// Erzeugt leere Sites, die weder einander noch ein Feature treffen.
pub struct SiteSampler<'a> {
    region: &'a SamplingRegion,
    avoid: &'a [SimpleFeature],
    max_attempts: usize,
}

impl<'a> SiteSampler<'a> {
    pub fn new(region: &'a SamplingRegion, avoid: &'a [SimpleFeature], max_attempts: usize) -> Self {
        Self {
            region,
            avoid,
            max_attempts,
        }
    }

    fn collides(&self, candidate: Coordinate, accepted: &[Coordinate]) -> bool {
        let point = Point(candidate);
        accepted.contains(&candidate)
            || self
                .avoid
                .iter()
                .any(|feature| feature.shape.touches_point(&point))
    }

    /// Zieht `count` Sites. Jede Site hat höchstens `max_attempts` Versuche.
    pub fn sample<S: SiteSource + ?Sized>(
        &self,
        count: usize,
        source: &mut S,
    ) -> PartitionResult<Vec<Coordinate>> {
        let mut accepted: Vec<Coordinate> = Vec::with_capacity(count);
        if count == 0 {
            return Ok(accepted);
        }

        let frame = self
            .region
            .frame()
            .ok_or_else(|| PartitionError::InvalidGeometry {
                reason: "sampling region has no extent".to_string(),
            })?;

        while accepted.len() < count {
            let mut placed = false;
            for _ in 0..self.max_attempts {
                let candidate = Coordinate {
                    x: frame.min.x + source.next_unit() * frame.width(),
                    y: frame.min.y + source.next_unit() * frame.height(),
                };
                if !self.region.accepts(&Point(candidate)) || self.collides(candidate, &accepted) {
                    continue;
                }
                accepted.push(candidate);
                placed = true;
                break;
            }

            if !placed {
                warn!(
                    "Site sampling gave up on site {} after {} attempts",
                    accepted.len(),
                    self.max_attempts
                );
                return Err(PartitionError::GenerationExhausted {
                    iterations: self.max_attempts,
                    reason: format!(
                        "no free position for empty site {} of {}",
                        accepted.len() + 1,
                        count
                    ),
                });
            }
        }

        debug!("Sampled {} empty sites", accepted.len());
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Shape;
    use geo::{Coord, polygon};

    fn square(size: f64) -> Bounds2D {
        Bounds2D::from_points(Coord { x: 0.0, y: 0.0 }, Coord { x: size, y: size })
    }

    #[test]
    fn test_sequence_source_cycles() {
        let mut source = SequenceSource::new(vec![0.1, 0.2]);
        let drawn: Vec<f64> = (0..5).map(|_| source.next_unit()).collect();
        assert_eq!(drawn, vec![0.1, 0.2, 0.1, 0.2, 0.1]);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = RngSource::seeded(7);
        let mut b = RngSource::seeded(7);
        for _ in 0..10 {
            let value = a.next_unit();
            assert!((0.0..1.0).contains(&value));
            assert_eq!(value, b.next_unit());
        }
    }

    #[test]
    fn test_samples_map_into_rect() {
        let region = SamplingRegion::Rect(square(10.0));
        let sampler = SiteSampler::new(&region, &[], 10);
        let mut source = SequenceSource::new(vec![0.5, 0.25]);

        let sites = sampler.sample(1, &mut source).unwrap();
        assert_eq!(sites, vec![Coord { x: 5.0, y: 2.5 }]);
    }

    #[test]
    fn test_duplicate_sample_rejected() {
        let region = SamplingRegion::Rect(square(10.0));
        let sampler = SiteSampler::new(&region, &[], 10);
        // Die zweite Ziehung trifft die erste Site und wird verworfen
        let mut source = SequenceSource::new(vec![0.5, 0.5, 0.5, 0.5, 0.1, 0.1]);

        let sites = sampler.sample(2, &mut source).unwrap();
        assert_eq!(
            sites,
            vec![Coord { x: 5.0, y: 5.0 }, Coord { x: 1.0, y: 1.0 }]
        );
    }

    #[test]
    fn test_feature_area_avoided() {
        let region = SamplingRegion::Rect(square(10.0));
        let avoid = vec![SimpleFeature {
            index: 0,
            source: 0,
            shape: Shape::Polygon(polygon![
                (x: 0.0, y: 0.0),
                (x: 6.0, y: 0.0),
                (x: 6.0, y: 6.0),
                (x: 0.0, y: 6.0),
            ]),
        }];
        let sampler = SiteSampler::new(&region, &avoid, 10);
        let mut source = SequenceSource::new(vec![0.2, 0.2, 0.8, 0.8]);

        let sites = sampler.sample(1, &mut source).unwrap();
        assert_eq!(sites, vec![Coord { x: 8.0, y: 8.0 }]);
    }

    #[test]
    fn test_polygon_region_rejects_outside() {
        let triangle = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 10.0),
        ];
        let region = SamplingRegion::Polygon(MultiPolygon::new(vec![triangle]));
        let sampler = SiteSampler::new(&region, &[], 10);
        // (9, 9) liegt außerhalb des Dreiecks, (1, 2) innerhalb
        let mut source = SequenceSource::new(vec![0.9, 0.9, 0.1, 0.2]);

        let sites = sampler.sample(1, &mut source).unwrap();
        assert_eq!(sites, vec![Coord { x: 1.0, y: 2.0 }]);
    }

    #[test]
    fn test_covered_region_exhausts() {
        let region = SamplingRegion::Rect(square(10.0));
        let avoid = vec![SimpleFeature {
            index: 0,
            source: 0,
            shape: Shape::Polygon(square(10.0).to_polygon()),
        }];
        let sampler = SiteSampler::new(&region, &avoid, 25);
        let mut source = RngSource::seeded(1);

        let result = sampler.sample(1, &mut source);
        assert!(matches!(
            result,
            Err(PartitionError::GenerationExhausted { iterations: 25, .. })
        ));
    }
}
