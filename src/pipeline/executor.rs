//! Execution engine — runs the pipeline against the loaded image.
//!
//! A run duplicates the original into a tracked working [`Frame`], applies
//! every enabled step in order (unresolved kinds are skipped, not fatal),
//! and captures the final buffer into the preview snapshot. Ownership of the
//! working buffer moves step by step: the engine holds exactly one current
//! frame, briefly two while a transform's result is being swapped in.
//!
//! Failures abort the remaining steps, keep the previous snapshot on screen,
//! and surface through the [`RunReport`]. Nothing escapes the engine
//! boundary. A run requested while one is in flight is dropped, not queued —
//! the caller re-triggers once the in-flight run completes.

use crate::pipeline::error::PipelineError;
use crate::pipeline::frame::{AllocationLedger, Frame};
use crate::pipeline::model::PipelineModel;
use crate::registry::{OperationRegistry, ResolvedParams, RunContext};
use image::RgbaImage;
use std::time::{Duration, Instant};

/// Machine-usable summary of one run, published to the status boundary.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub success: bool,
    /// Enabled steps that actually executed.
    pub steps_executed: usize,
    /// Enabled steps skipped because their kind is unknown.
    pub steps_skipped: usize,
    pub duration: Duration,
    pub error: Option<String>,
}

impl RunReport {
    fn success(steps_executed: usize, steps_skipped: usize, duration: Duration) -> Self {
        Self {
            success: true,
            steps_executed,
            steps_skipped,
            duration,
            error: None,
        }
    }

    fn failure(
        steps_executed: usize,
        steps_skipped: usize,
        duration: Duration,
        error: String,
    ) -> Self {
        Self {
            success: false,
            steps_executed,
            steps_skipped,
            duration,
            error: Some(error),
        }
    }
}

/// Result of a run request.
#[derive(Debug, Clone)]
pub enum RunStatus {
    Completed(RunReport),
    /// A run was already in flight; this request was dropped, not queued.
    Dropped,
}

/// The pipeline execution engine.
#[derive(Debug, Default)]
pub struct Executor {
    in_flight: bool,
    ledger: AllocationLedger,
    snapshot: Option<RgbaImage>,
    last_report: Option<RunReport>,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixel copy of the last successful run's output. Stays put across
    /// failed runs so the compare view keeps showing the last good result.
    pub fn snapshot(&self) -> Option<&RgbaImage> {
        self.snapshot.as_ref()
    }

    /// Drop the snapshot (a new image was loaded; the old preview is stale).
    pub fn clear_snapshot(&mut self) {
        self.snapshot = None;
    }

    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    /// Frame-lifetime counters, used by the buffer-accounting tests.
    pub fn ledger(&self) -> &AllocationLedger {
        &self.ledger
    }

    /// Execute the pipeline against `original`.
    ///
    /// `original` is borrowed read-only for the whole run and shared with
    /// every transform through the run context; the engine owns all working
    /// frames and releases them before returning.
    pub fn run(
        &mut self,
        original: Option<&RgbaImage>,
        model: &PipelineModel,
        registry: &OperationRegistry,
    ) -> RunStatus {
        if self.in_flight {
            tracing::debug!("run request dropped: a run is already in flight");
            return RunStatus::Dropped;
        }
        self.in_flight = true;
        let report = self.execute(original, model, registry);
        self.in_flight = false;
        debug_assert_eq!(self.ledger.live(), 0, "working frame leaked past run");

        if let Some(error) = &report.error {
            tracing::warn!(error = %error, "pipeline run failed");
        } else {
            tracing::debug!(
                steps = report.steps_executed,
                skipped = report.steps_skipped,
                elapsed_ms = report.duration.as_millis() as u64,
                "pipeline run completed"
            );
        }
        self.last_report = Some(report.clone());
        RunStatus::Completed(report)
    }

    fn execute(
        &mut self,
        original: Option<&RgbaImage>,
        model: &PipelineModel,
        registry: &OperationRegistry,
    ) -> RunReport {
        let started = Instant::now();
        let Some(original) = original else {
            return RunReport::failure(
                0,
                0,
                started.elapsed(),
                PipelineError::NoImageLoaded.to_string(),
            );
        };

        let mut current = Frame::tracked(original.clone(), &self.ledger);
        let ctx = RunContext { original };
        let mut executed = 0;
        let mut skipped = 0;

        for step in model.steps().iter().filter(|s| s.enabled) {
            let Some(def) = registry.lookup(&step.kind) else {
                skipped += 1;
                tracing::warn!(kind = %step.kind, step = %step.id, "skipping unknown operation kind");
                continue;
            };
            let params = ResolvedParams::new(def.params, &step.params);
            match (def.transform)(current.pixels(), &params, &ctx) {
                Ok(next) => {
                    // The assignment releases the superseded frame after the
                    // new one is tracked; at most two working frames overlap.
                    current = Frame::tracked(next, &self.ledger);
                    executed += 1;
                }
                Err(err) => {
                    let error = PipelineError::Transform {
                        kind: step.kind.clone(),
                        message: err.0,
                    };
                    // `current` drops here; the previous snapshot survives.
                    return RunReport::failure(
                        executed,
                        skipped,
                        started.elapsed(),
                        error.to_string(),
                    );
                }
            }
        }

        // Even a zero-step run produces a result: the untouched duplicate.
        self.snapshot = Some(current.pixels().clone());
        RunReport::success(executed, skipped, started.elapsed())
    }
}
