// src/partition/clip.rs

//! # Cell Clipping
//!
//! Intersects merged cells with the bounding region and splits multi-part
//! results into independent polygons that keep their owner.

use crate::partition::merger::{MergedCell, Owner};
use geo::{BooleanOps, MultiPolygon, Polygon};
use tracing::debug;

/// One output polygon and the owner it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputCell {
    pub owner: Owner,
    pub polygon: Polygon<f64>,
}

/// Clips merged cells against a fixed region.
pub struct Clipper {
    region: MultiPolygon<f64>,
}

impl Clipper {
    /// Creates a clipper for the given region.
    ///
    /// # Arguments
    /// * `region` - Either the bounding feature or the extended input bounding box.
    pub fn new(region: MultiPolygon<f64>) -> Self {
        Self { region }
    }

    /// Clips every cell, preserving cell order. Parts of one cell are emitted
    /// contiguously; cells that fall completely outside the region yield nothing.
    pub fn clip(&self, cells: &[MergedCell]) -> Vec<OutputCell> {
        let mut output = Vec::with_capacity(cells.len());
        for cell in cells {
            let clipped = self.region.intersection(&cell.shape);
            if clipped.0.is_empty() {
                debug!("Cell of {} lies outside the clip region", cell.owner);
            }
            output.extend(clipped.into_iter().map(|polygon| OutputCell {
                owner: cell.owner,
                polygon,
            }));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Area, polygon};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ]
    }

    #[test]
    fn test_cell_cut_to_region() {
        let clipper = Clipper::new(MultiPolygon::new(vec![square(0.0, 0.0, 10.0)]));
        let cells = vec![MergedCell {
            owner: Owner::EmptySite(0),
            shape: MultiPolygon::new(vec![square(5.0, 5.0, 10.0)]),
        }];

        let output = clipper.clip(&cells);

        assert_eq!(output.len(), 1);
        assert_eq!(output[0].owner, Owner::EmptySite(0));
        assert_relative_eq!(output[0].polygon.unsigned_area(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_multi_part_result_is_split() {
        // U-förmige Region: die Zelle quer über die Öffnung zerfällt in zwei Teile
        let region = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 7.0, y: 10.0),
            (x: 7.0, y: 3.0),
            (x: 3.0, y: 3.0),
            (x: 3.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ];
        let clipper = Clipper::new(MultiPolygon::new(vec![region]));
        let band = polygon![
            (x: -1.0, y: 5.0),
            (x: 11.0, y: 5.0),
            (x: 11.0, y: 6.0),
            (x: -1.0, y: 6.0),
        ];
        let cells = vec![
            MergedCell {
                owner: Owner::Feature { index: 0, source: 0 },
                shape: MultiPolygon::new(vec![band]),
            },
            MergedCell {
                owner: Owner::EmptySite(0),
                shape: MultiPolygon::new(vec![square(1.0, 1.0, 1.0)]),
            },
        ];

        let output = clipper.clip(&cells);

        assert_eq!(output.len(), 3);
        assert_eq!(output[0].owner, Owner::Feature { index: 0, source: 0 });
        assert_eq!(output[1].owner, Owner::Feature { index: 0, source: 0 });
        assert_eq!(output[2].owner, Owner::EmptySite(0));
        for part in &output[..2] {
            assert_relative_eq!(part.polygon.unsigned_area(), 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cell_outside_region_dropped() {
        let clipper = Clipper::new(MultiPolygon::new(vec![square(0.0, 0.0, 1.0)]));
        let cells = vec![MergedCell {
            owner: Owner::Orphan(0),
            shape: MultiPolygon::new(vec![square(5.0, 5.0, 1.0)]),
        }];

        assert!(clipper.clip(&cells).is_empty());
    }
}
