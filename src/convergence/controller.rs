//! Convergence controller

use tracing::{debug, info};

use super::{ConvergenceError, DiagnosticSource, ManifestSink, StuckReason};
use crate::maven::Parser;
use crate::model::{ArtifactId, Conflict};
use crate::resolve::{CircularDependency, EditDecision, ResolutionAggregator};

/// Summary of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvergenceReport {
    /// Diagnostic runs, including the final clean one
    pub iterations: usize,
    pub decisions_applied: usize,
    /// Circular paths skipped along the way
    pub circular: Vec<CircularDependency>,
}

/// What the previous iteration saw and did
struct Previous {
    fingerprints: Vec<String>,
    changed: bool,
}

pub struct ConvergenceController<'a> {
    aggregator: ResolutionAggregator<'a>,
    max_iterations: Option<usize>,
}

impl<'a> ConvergenceController<'a> {
    pub fn new(aggregator: ResolutionAggregator<'a>) -> Self {
        Self {
            aggregator,
            max_iterations: None,
        }
    }

    /// Give up after `limit` edit batches
    pub fn with_max_iterations(mut self, limit: Option<usize>) -> Self {
        self.max_iterations = limit;
        self
    }

    /// Iterate until the build reports no conflicts
    pub fn run<S, M>(&self, source: &mut S, sink: &mut M) -> Result<ConvergenceReport, ConvergenceError>
    where
        S: DiagnosticSource + ?Sized,
        M: ManifestSink + ?Sized,
    {
        let mut report = ConvergenceReport::default();
        let mut previous: Option<Previous> = None;

        loop {
            let lines = source.diagnostics()?;
            let conflicts = Parser::parse_convergence(&lines, self.aggregator.policy())?;
            report.iterations += 1;
            info!(
                "Iteration {}: {} conflicts remaining",
                report.iterations,
                conflicts.len()
            );

            if conflicts.is_empty() {
                return Ok(report);
            }

            let fingerprints: Vec<String> = conflicts.iter().map(Conflict::fingerprint).collect();
            if let Some(previous) = &previous
                && previous.fingerprints.len() == fingerprints.len()
            {
                let reason = if previous.fingerprints == fingerprints {
                    StuckReason::Unchanged
                } else if !previous.changed {
                    StuckReason::NoProgress
                } else {
                    StuckReason::CountUnchanged(fingerprints.len())
                };
                return Err(ConvergenceError::Stuck {
                    iterations: report.iterations,
                    remaining: conflicts.len(),
                    reason,
                    circular: report.circular,
                });
            }

            if let Some(limit) = self.max_iterations
                && report.iterations > limit
            {
                return Err(ConvergenceError::Stuck {
                    iterations: report.iterations,
                    remaining: conflicts.len(),
                    reason: StuckReason::IterationLimit(limit),
                    circular: report.circular,
                });
            }

            let batch = self.plan_batch(&conflicts, &mut report)?;
            let changed = sink.apply(&batch)?;
            report.decisions_applied += batch.len();
            previous = Some(Previous {
                fingerprints,
                changed,
            });
        }
    }

    /// Decide edits for conflicts in report order, stopping before one
    /// whose paths involve an artifact already handled in this batch
    fn plan_batch(
        &self,
        conflicts: &[Conflict],
        report: &mut ConvergenceReport,
    ) -> Result<Vec<EditDecision>, ConvergenceError> {
        let mut handled: Vec<&ArtifactId> = Vec::new();
        let mut batch = Vec::new();

        for (position, conflict) in conflicts.iter().enumerate() {
            info!(
                "Processing conflict: {} to version: {}",
                conflict.id(),
                conflict.version()
            );
            let resolution = self.aggregator.resolve(conflict)?;
            for decision in &resolution.decisions {
                debug!("Planned: {decision}");
            }
            batch.extend(resolution.decisions);
            for cycle in resolution.circular {
                if !report.circular.contains(&cycle) {
                    report.circular.push(cycle);
                }
            }
            handled.push(conflict.id());

            if let Some(next) = conflicts.get(position + 1)
                && handled.iter().any(|id| next.references(id))
            {
                debug!(next = %next.id(), "Next conflict overlaps this batch, deferring it");
                break;
            }
        }

        Ok(batch)
    }
}
