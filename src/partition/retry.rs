// src/partition/retry.rs

use crate::error::{PartitionError, PartitionResult};
use crate::types::Coordinate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Obergrenze der verdichteten Sites als Vielfaches von max(Start-Sites, Iterationslimit).
pub const SITE_BUDGET_FACTOR: usize = 2;

/// Zustände der Generierungsschleife.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Sampling,
    Built,
    Densifying,
    Valid,
    Failed,
}

/// Ergebnis der Prüfung eines gebauten Diagramms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildVerdict {
    Valid,
    CountMismatch { expected: usize, actual: usize },
    ContainmentFailed,
}

/// Was die Pipeline als Nächstes tun soll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Leere Sites neu ziehen, Dichte beibehalten.
    Resample,
    /// Mit halbiertem Segmentintervall neu verdichten.
    Refine,
    Accept,
}

/// Protokoll eines Generierungslaufs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionReport {
    /// Anzahl der gebauten Diagramme.
    pub iterations: usize,
    pub resamples: usize,
    pub refinements: usize,
    /// Alle verwendeten Segmentintervalle, in Reihenfolge.
    pub segment_lengths: Vec<f64>,
    /// Die leeren Sites des akzeptierten Diagramms.
    pub empty_sites: Vec<Coordinate>,
}

/// Begrenzte Zustandsmaschine für die Wiederholungen.
#[derive(Debug, Clone)]
pub struct RetryController {
    max_iterations: usize,
    site_budget: usize,
    segment_length: f64,
    state: RetryState,
    report: PartitionReport,
}

impl RetryController {
    /// `initial_sites` ist die Anzahl der Sites nach der ersten Verdichtung.
    pub fn new(segment_length: f64, max_iterations: usize, initial_sites: usize) -> Self {
        Self {
            max_iterations,
            site_budget: initial_sites.max(max_iterations) * SITE_BUDGET_FACTOR,
            segment_length,
            state: RetryState::Sampling,
            report: PartitionReport {
                segment_lengths: vec![segment_length],
                ..Default::default()
            },
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn segment_length(&self) -> f64 {
        self.segment_length
    }

    pub fn site_budget(&self) -> usize {
        self.site_budget
    }

    pub fn report(&self) -> &PartitionReport {
        &self.report
    }

    pub fn into_report(self) -> PartitionReport {
        self.report
    }

    /// Zählt einen Build; schlägt fehl, wenn das Limit bereits erreicht ist.
    pub fn begin_build(&mut self) -> PartitionResult<()> {
        if self.report.iterations >= self.max_iterations {
            self.state = RetryState::Failed;
            warn!(
                "Giving up after {} diagram builds (segment length {:.6})",
                self.report.iterations, self.segment_length
            );
            return Err(PartitionError::GenerationExhausted {
                iterations: self.report.iterations,
                reason: format!(
                    "no valid diagram, last segment length {}",
                    self.segment_length
                ),
            });
        }

        self.report.iterations += 1;
        self.state = RetryState::Built;
        Ok(())
    }

    pub fn judge(&mut self, verdict: BuildVerdict) -> NextStep {
        match verdict {
            BuildVerdict::Valid => {
                self.state = RetryState::Valid;
                debug!("Diagram valid after {} builds", self.report.iterations);
                NextStep::Accept
            }
            BuildVerdict::CountMismatch { expected, actual } => {
                self.state = RetryState::Sampling;
                self.report.resamples += 1;
                debug!(
                    "Build {}: expected {} cells, got {}; resampling empty sites",
                    self.report.iterations, expected, actual
                );
                NextStep::Resample
            }
            BuildVerdict::ContainmentFailed => {
                self.state = RetryState::Densifying;
                self.segment_length *= 0.5;
                self.report.refinements += 1;
                self.report.segment_lengths.push(self.segment_length);
                debug!(
                    "Build {}: containment failed; segment length now {:.6}",
                    self.report.iterations, self.segment_length
                );
                NextStep::Refine
            }
        }
    }

    /// Jede Halbierung verdoppelt grob die Sites; über dem Budget wird abgebrochen.
    pub fn check_site_budget(&mut self, sites: usize) -> PartitionResult<()> {
        if sites <= self.site_budget {
            return Ok(());
        }

        self.state = RetryState::Failed;
        warn!(
            "Giving up after {} diagram builds: {} sites at segment length {:.6} exceed the budget of {}",
            self.report.iterations, sites, self.segment_length, self.site_budget
        );
        Err(PartitionError::GenerationExhausted {
            iterations: self.report.iterations,
            reason: format!(
                "densification needs {} sites at segment length {}, budget is {}",
                sites, self.segment_length, self.site_budget
            ),
        })
    }

    pub fn record_empty_sites(&mut self, sites: &[Coordinate]) {
        self.report.empty_sites = sites.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_containment_failure_halves_length() {
        let mut controller = RetryController::new(4.0, 10, 5);
        controller.begin_build().unwrap();

        assert_eq!(controller.judge(BuildVerdict::ContainmentFailed), NextStep::Refine);
        assert_eq!(controller.state(), RetryState::Densifying);
        assert_relative_eq!(controller.segment_length(), 2.0);

        controller.begin_build().unwrap();
        controller.judge(BuildVerdict::ContainmentFailed);
        assert_eq!(controller.report().segment_lengths, vec![4.0, 2.0, 1.0]);
    }

    #[test]
    fn test_count_mismatch_keeps_length() {
        let mut controller = RetryController::new(4.0, 10, 5);
        controller.begin_build().unwrap();

        let step = controller.judge(BuildVerdict::CountMismatch {
            expected: 3,
            actual: 2,
        });

        assert_eq!(step, NextStep::Resample);
        assert_eq!(controller.state(), RetryState::Sampling);
        assert_relative_eq!(controller.segment_length(), 4.0);
        assert_eq!(controller.report().resamples, 1);
    }

    #[test]
    fn test_valid_is_accepted() {
        let mut controller = RetryController::new(1.0, 10, 5);
        controller.begin_build().unwrap();

        assert_eq!(controller.judge(BuildVerdict::Valid), NextStep::Accept);
        assert_eq!(controller.state(), RetryState::Valid);
        assert_eq!(controller.into_report().iterations, 1);
    }

    #[test]
    fn test_cap_raises_exhaustion() {
        let mut controller = RetryController::new(1.0, 2, 5);
        controller.begin_build().unwrap();
        controller.judge(BuildVerdict::ContainmentFailed);
        controller.begin_build().unwrap();
        controller.judge(BuildVerdict::ContainmentFailed);

        let result = controller.begin_build();

        assert!(matches!(
            result,
            Err(PartitionError::GenerationExhausted { iterations: 2, .. })
        ));
        assert_eq!(controller.state(), RetryState::Failed);
    }

    #[test]
    fn test_site_budget_stops_refinement() {
        let mut controller = RetryController::new(1.0, 10, 30);
        // max(30, 10) * 2
        assert_eq!(controller.site_budget(), 60);

        controller.begin_build().unwrap();
        assert_eq!(controller.judge(BuildVerdict::ContainmentFailed), NextStep::Refine);
        assert!(controller.check_site_budget(60).is_ok());

        let result = controller.check_site_budget(61);
        assert!(matches!(
            result,
            Err(PartitionError::GenerationExhausted { iterations: 1, .. })
        ));
        assert_eq!(controller.state(), RetryState::Failed);
    }
}
