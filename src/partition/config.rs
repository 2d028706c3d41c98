// src/partition/config.rs

use crate::error::{PartitionError, PartitionResult};
use serde::{Deserialize, Serialize};

/// Obergrenze für Diagramm-Builds pro Aufruf.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
/// Rand um die Bounding Box der Eingaben, relativ zur kleineren Seitenlänge.
pub const DEFAULT_BOUNDS_MARGIN: f64 = 0.01;
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 0.0001;

/// Konfiguration für die Partitionierung einer Feature-Sammlung in Voronoi-Zellen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Anzahl zusätzlicher Sites ohne zugehöriges Feature.
    pub empty_sites: usize,
    /// Maximale Anzahl an Diagramm-Builds, bevor die Generierung abbricht.
    /// Gilt ebenso für die Ziehungen pro leerer Site im Sampler.
    pub max_iterations: usize,
    /// Bruchteil von min(Breite, Höhe), um den die Bounding Box erweitert wird.
    pub bounds_margin: f64,
    /// Toleranz für Ramer-Douglas-Peucker; 0 deaktiviert die Vereinfachung.
    pub simplify_tolerance: f64,
    /// Optionaler Seed für die Zufallszahlengenerierung.
    pub seed: Option<u64>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            empty_sites: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            bounds_margin: DEFAULT_BOUNDS_MARGIN,
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
            seed: None,
        }
    }
}

impl PartitionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_sites(mut self, count: usize) -> Self {
        self.empty_sites = count;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_bounds_margin(mut self, margin: f64) -> Self {
        self.bounds_margin = margin;
        self
    }

    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify_tolerance = tolerance;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> PartitionResult<()> {
        if self.max_iterations == 0 {
            return Err(PartitionError::InvalidConfiguration {
                message: "max_iterations must be greater than 0.".to_string(),
            });
        }
        if !self.bounds_margin.is_finite() || self.bounds_margin < 0.0 {
            return Err(PartitionError::InvalidConfiguration {
                message: format!(
                    "bounds_margin must be a non-negative number, got {}.",
                    self.bounds_margin
                ),
            });
        }
        if !self.simplify_tolerance.is_finite() || self.simplify_tolerance < 0.0 {
            return Err(PartitionError::InvalidConfiguration {
                message: format!(
                    "simplify_tolerance must be a non-negative number, got {}.",
                    self.simplify_tolerance
                ),
            });
        }
        Ok(())
    }
}
