// src/partition/validation.rs

use crate::partition::merger::MergedCell;
use crate::partition::retry::BuildVerdict;
use crate::types::{Coordinate, SimpleFeature};
use geo::{Contains, Point};

/// Prüft die Topologie eines zusammengeführten Diagramms.
pub struct Validator<'a> {
    features: &'a [SimpleFeature],
    empty_sites: &'a [Coordinate],
}

impl<'a> Validator<'a> {
    pub fn new(features: &'a [SimpleFeature], empty_sites: &'a [Coordinate]) -> Self {
        Self {
            features,
            empty_sites,
        }
    }

    /// Erwartete Zellenzahl: ein Besitzer pro Feature und pro leerer Site.
    pub fn expected_cells(&self) -> usize {
        self.features.len() + self.empty_sites.len()
    }

    pub fn has_expected_count(&self, cells: &[MergedCell]) -> bool {
        cells.len() == self.expected_cells()
    }

    /// Jedes Feature und jede leere Site liegt in genau einer Zelle.
    pub fn is_contained(&self, cells: &[MergedCell]) -> bool {
        let features_ok = self.features.iter().all(|feature| {
            cells
                .iter()
                .filter(|cell| feature.shape.is_within(&cell.shape))
                .count()
                == 1
        });

        features_ok
            && self.empty_sites.iter().all(|site| {
                let point = Point(*site);
                cells.iter().filter(|cell| cell.shape.contains(&point)).count() == 1
            })
    }

    /// Zählung vor Enthaltensein: eine falsche Zellenzahl verlangt neues Sampling, kein Verdichten.
    pub fn verdict(&self, cells: &[MergedCell]) -> BuildVerdict {
        if !self.has_expected_count(cells) {
            BuildVerdict::CountMismatch {
                expected: self.expected_cells(),
                actual: cells.len(),
            }
        } else if !self.is_contained(cells) {
            BuildVerdict::ContainmentFailed
        } else {
            BuildVerdict::Valid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::merger::Owner;
    use crate::types::Shape;
    use geo::{LineString, MultiPolygon, polygon};

    fn cell(owner: Owner, x0: f64, x1: f64) -> MergedCell {
        MergedCell {
            owner,
            shape: MultiPolygon::new(vec![polygon![
                (x: x0, y: 0.0),
                (x: x1, y: 0.0),
                (x: x1, y: 10.0),
                (x: x0, y: 10.0),
            ]]),
        }
    }

    #[test]
    fn test_valid_partition() {
        let features = vec![SimpleFeature {
            index: 0,
            source: 0,
            shape: Shape::Point(Point::new(2.0, 5.0)),
        }];
        let empty = vec![Coordinate { x: 8.0, y: 5.0 }];
        let cells = vec![
            cell(Owner::Feature { index: 0, source: 0 }, 0.0, 5.0),
            cell(Owner::EmptySite(0), 5.0, 10.0),
        ];

        let validator = Validator::new(&features, &empty);
        assert_eq!(validator.verdict(&cells), BuildVerdict::Valid);
    }

    #[test]
    fn test_feature_split_across_cells_is_invalid() {
        let features = vec![SimpleFeature {
            index: 0,
            source: 0,
            shape: Shape::LineString(LineString::from(vec![(2.0, 5.0), (8.0, 5.0)])),
        }];
        let cells = vec![
            cell(Owner::Feature { index: 0, source: 0 }, 0.0, 5.0),
            cell(Owner::Orphan(0), 5.0, 10.0),
        ];

        let validator = Validator::new(&features, &[]);
        assert!(!validator.is_contained(&cells));
        assert_eq!(validator.verdict(&cells), BuildVerdict::CountMismatch { expected: 1, actual: 2 });
    }

    #[test]
    fn test_count_mismatch_detected() {
        let features = vec![SimpleFeature {
            index: 0,
            source: 0,
            shape: Shape::Point(Point::new(2.0, 5.0)),
        }];
        let cells = vec![
            cell(Owner::Feature { index: 0, source: 0 }, 0.0, 5.0),
            cell(Owner::Orphan(0), 5.0, 10.0),
        ];

        let validator = Validator::new(&features, &[]);
        assert!(validator.is_contained(&cells));
        assert!(!validator.has_expected_count(&cells));
        assert_eq!(validator.verdict(&cells), BuildVerdict::CountMismatch { expected: 1, actual: 2 });
    }

    #[test]
    fn test_containment_failure_verdict() {
        // Linie kreuzt die Grenze bei x = 5, die Zellenzahl stimmt
        let features = vec![
            SimpleFeature {
                index: 0,
                source: 0,
                shape: Shape::LineString(LineString::from(vec![(2.0, 5.0), (8.0, 5.0)])),
            },
            SimpleFeature {
                index: 1,
                source: 1,
                shape: Shape::Point(Point::new(8.0, 2.0)),
            },
        ];
        let cells = vec![
            cell(Owner::Feature { index: 0, source: 0 }, 0.0, 5.0),
            cell(Owner::Feature { index: 1, source: 1 }, 5.0, 10.0),
        ];

        let validator = Validator::new(&features, &[]);
        assert_eq!(validator.verdict(&cells), BuildVerdict::ContainmentFailed);
    }
}
