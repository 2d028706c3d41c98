// src/partition/densify.rs

use crate::types::{Bounds2D, Coordinate, SimpleFeature};
use geo::{Distance, Euclidean, Point};
use tracing::debug;

/// Verdichtete Koordinaten, gruppiert nach zerlegtem Feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensifiedSites {
    pub per_feature: Vec<Vec<Coordinate>>,
}

impl DensifiedSites {
    /// Alle Sites in Feature-Reihenfolge.
    pub fn all(&self) -> Vec<Coordinate> {
        self.per_feature.iter().flatten().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.per_feature.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn distance(a: Coordinate, b: Coordinate) -> f64 {
    Euclidean.distance(Point(a), Point(b))
}

/// Mittlere Länge aller aufeinanderfolgenden Koordinatenpaare.
/// `None`, wenn kein Feature mehr als eine Koordinate hat.
pub fn mean_segment_length(features: &[SimpleFeature]) -> Option<f64> {
    let (sum, count) = features
        .iter()
        .flat_map(|feature| feature.shape.ring().windows(2))
        .fold((0.0, 0usize), |(sum, count), pair| {
            (sum + distance(pair[0], pair[1]), count + 1)
        });

    (count > 0).then(|| sum / count as f64)
}

/// Startintervall für den ersten Durchlauf, immer strikt positiv.
///
/// Ohne messbare Segmente (nur Punkte oder Mittelwert 0) wird auf die
/// Diagonale der Feature-Bounds zurückgegriffen, notfalls auf 1.0.
pub fn initial_segment_length(features: &[SimpleFeature], bounds: Option<&Bounds2D>) -> f64 {
    if let Some(mean) = mean_segment_length(features).filter(|mean| *mean > 0.0) {
        return mean;
    }

    let fallback = bounds
        .map(Bounds2D::diagonal)
        .filter(|diagonal| *diagonal > 0.0 && diagonal.is_finite())
        .unwrap_or(1.0);

    debug!(
        "No usable mean segment length, falling back to {:.6}",
        fallback
    );
    fallback
}

fn densify_ring(ring: &[Coordinate], segment_length: f64) -> Vec<Coordinate> {
    let Some(&start) = ring.first() else {
        return Vec::new();
    };

    let mut out = vec![start];
    for pair in ring.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let d = distance(a, b);
        if d > segment_length {
            let n = (d / segment_length).ceil() as usize;
            out.extend((1..n).map(|k| a + (b - a) * (k as f64 / n as f64)));
        }
        if b != start {
            out.push(b);
        }
    }
    out
}

/// Unterteilt jede Kante, die länger als `segment_length` ist, in gleich lange Stücke.
pub fn densify(features: &[SimpleFeature], segment_length: f64) -> DensifiedSites {
    let per_feature: Vec<Vec<Coordinate>> = features
        .iter()
        .map(|feature| densify_ring(feature.shape.ring(), segment_length))
        .collect();

    let sites = DensifiedSites { per_feature };
    debug!(
        "Densified {} features into {} sites at segment length {:.6}",
        features.len(),
        sites.len(),
        segment_length
    );
    sites
}
