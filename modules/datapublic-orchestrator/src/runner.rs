use std::time::Instant;
use tracing::{info, warn};

use datapublic_common::{FailurePolicy, Result, StepSpec};

use crate::report::{AbortRecord, RunReport, StepOutcome, StepRecord};
use crate::step::{CommandStep, Runnable};

/// A runnable paired with what to do if it fails.
pub struct ScheduledStep {
    pub step: Box<dyn Runnable>,
    pub policy: FailurePolicy,
}

/// Runs update steps one at a time, in the order they were added.
#[derive(Default)]
pub struct UpdateRunner {
    steps: Vec<ScheduledStep>,
}

impl UpdateRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: &[StepSpec]) -> Self {
        specs.iter().fold(Self::new(), |runner, spec| {
            runner.step(CommandStep::from_spec(spec), spec.policy)
        })
    }

    pub fn step(mut self, step: impl Runnable + 'static, policy: FailurePolicy) -> Self {
        self.steps.push(ScheduledStep {
            step: Box::new(step),
            policy,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Execute every step and fail with
    /// [`DataPublicError::StepAborted`](datapublic_common::DataPublicError::StepAborted)
    /// if an abort-on-failure step failed.
    pub async fn run(&self) -> Result<RunReport> {
        self.execute().await.into_result()
    }

    /// Execute every step. The first failure of an abort-on-failure step ends
    /// the run; later steps never start. The report records the abort, so the
    /// partial run can still be inspected or persisted.
    pub async fn execute(&self) -> RunReport {
        let mut report = RunReport::start();
        info!(run_id = %report.run_id, steps = self.steps.len(), "Update run starting");

        for (index, scheduled) in self.steps.iter().enumerate() {
            let name = scheduled.step.name();
            info!(step = %name, position = index + 1, policy = %scheduled.policy, "Running update step");

            let started = Instant::now();
            let result = scheduled.step.run().await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let outcome = match result {
                Ok(()) => {
                    info!(step = %name, elapsed_ms, "Update step succeeded");
                    StepOutcome::Succeeded
                }
                Err(failure) => match scheduled.policy {
                    FailurePolicy::WarnAndContinue => {
                        warn!(step = %name, error = %failure, "Update step failed, continuing");
                        StepOutcome::Failed { failure }
                    }
                    FailurePolicy::AbortOnFailure => {
                        report.record(StepRecord {
                            name: name.to_string(),
                            policy: scheduled.policy,
                            outcome: StepOutcome::Failed {
                                failure: failure.clone(),
                            },
                            elapsed_ms,
                        });
                        report.abort(AbortRecord {
                            step: name.to_string(),
                            reason: failure.to_string(),
                            skipped: self.steps.len() - index - 1,
                        });
                        tracing::error!(
                            step = %name,
                            error = %failure,
                            "Update step failed, aborting run. {report}"
                        );
                        return report;
                    }
                },
            };

            report.record(StepRecord {
                name: name.to_string(),
                policy: scheduled.policy,
                outcome,
                elapsed_ms,
            });
        }

        report.finish();
        info!("Update run complete. {report}");
        report
    }
}
