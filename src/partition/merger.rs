// src/partition/merger.rs

use crate::partition::voronoi_diagram::RawCell;
use crate::types::{Coordinate, SimpleFeature};
use geo::{Intersects, MultiPolygon, Point, Polygon, unary_union};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Besitzer einer zusammengeführten Zelle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// Zerlegtes Feature `index`, stammt aus Eingabe-Feature `source`.
    Feature { index: usize, source: usize },
    /// Leere Site `i`.
    EmptySite(usize),
    /// Rohzelle ohne Besitzer, `i` zählt die Waisen in Verarbeitungsreihenfolge.
    Orphan(usize),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Feature { index, source } => write!(f, "feature {} (input {})", index, source),
            Owner::EmptySite(i) => write!(f, "empty site {}", i),
            Owner::Orphan(i) => write!(f, "orphan {}", i),
        }
    }
}

/// Vereinigung aller Rohzellen eines Besitzers.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedCell {
    pub owner: Owner,
    pub shape: MultiPolygon<f64>,
}

/// Ordnet Rohzellen ihren Besitzern zu und vereinigt sie.
pub struct PolygonMerger<'a> {
    features: &'a [SimpleFeature],
    empty_sites: &'a [Coordinate],
}

impl<'a> PolygonMerger<'a> {
    pub fn new(features: &'a [SimpleFeature], empty_sites: &'a [Coordinate]) -> Self {
        Self {
            features,
            empty_sites,
        }
    }

    /// Erster Besitzer in Eingabereihenfolge (Features vor leeren Sites), den die Zelle berührt.
    fn owner_slot(&self, cell: &Polygon<f64>) -> Option<usize> {
        self.features
            .iter()
            .position(|feature| feature.shape.intersects_cell(cell))
            .or_else(|| {
                self.empty_sites
                    .iter()
                    .position(|site| cell.intersects(&Point(*site)))
                    .map(|i| self.features.len() + i)
            })
    }

    fn owner_of_slot(&self, slot: usize) -> Owner {
        match self.features.get(slot) {
            Some(feature) => Owner::Feature {
                index: feature.index,
                source: feature.source,
            },
            None => Owner::EmptySite(slot - self.features.len()),
        }
    }

    fn union_group(cells: &[&Polygon<f64>]) -> MultiPolygon<f64> {
        match cells {
            [single] => MultiPolygon::new(vec![(*single).clone()]),
            // zuletzt zugeordnete Zelle zuerst
            _ => unary_union(cells.iter().rev().copied()),
        }
    }

    /// Liefert zuerst die belegten Besitzer in Slot-Reihenfolge, danach die Waisen.
    pub fn merge(&self, raw_cells: &[RawCell]) -> Vec<MergedCell> {
        let slots = self.features.len() + self.empty_sites.len();
        let mut groups: Vec<Vec<&Polygon<f64>>> = vec![Vec::new(); slots];
        let mut orphans: Vec<&Polygon<f64>> = Vec::new();

        for cell in raw_cells {
            match self.owner_slot(&cell.polygon) {
                Some(slot) => groups[slot].push(&cell.polygon),
                None => orphans.push(&cell.polygon),
            }
        }

        let mut merged: Vec<MergedCell> = groups
            .iter()
            .enumerate()
            .filter(|(_, group)| !group.is_empty())
            .map(|(slot, group)| MergedCell {
                owner: self.owner_of_slot(slot),
                shape: Self::union_group(group),
            })
            .collect();

        merged.extend(orphans.iter().enumerate().map(|(i, polygon)| MergedCell {
            owner: Owner::Orphan(i),
            shape: MultiPolygon::new(vec![(*polygon).clone()]),
        }));

        debug!(
            "Merged {} raw cells into {} cells ({} orphans)",
            raw_cells.len(),
            merged.len(),
            orphans.len()
        );

        merged
    }
}
