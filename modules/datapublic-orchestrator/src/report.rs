use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use uuid::Uuid;

use datapublic_common::{DataPublicError, FailurePolicy};

use crate::step::StepFailure;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Succeeded,
    Failed { failure: StepFailure },
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// What happened to one step in one run.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub name: String,
    pub policy: FailurePolicy,
    pub outcome: StepOutcome,
    pub elapsed_ms: u64,
}

/// The abort-on-failure step that ended a run early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbortRecord {
    pub step: String,
    pub reason: String,
    pub skipped: usize,
}

/// Record of a single update run, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepRecord>,
    pub aborted: Option<AbortRecord>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            steps: Vec::new(),
            aborted: None,
        }
    }

    pub fn record(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn abort(&mut self, abort: AbortRecord) {
        self.aborted = Some(abort);
        self.finish();
    }

    /// `Err(StepAborted)` for an aborted run, the report otherwise.
    pub fn into_result(self) -> datapublic_common::Result<Self> {
        match self.aborted {
            Some(AbortRecord { step, reason, .. }) => {
                Err(DataPublicError::StepAborted { step, reason })
            }
            None => Ok(self),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_success()).count()
    }

    /// Steps that failed but were allowed to.
    pub fn warned(&self) -> Vec<&StepRecord> {
        self.steps
            .iter()
            .filter(|s| !s.outcome.is_success() && s.policy == FailurePolicy::WarnAndContinue)
            .collect()
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run report: {}", path.display()))?;
        Ok(())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let warned = self.warned();
        write!(
            f,
            "run={} steps={} succeeded={} tolerated_failures={}",
            self.run_id,
            self.steps.len(),
            self.succeeded(),
            warned.len()
        )?;
        if !warned.is_empty() {
            let names: Vec<&str> = warned.iter().map(|s| s.name.as_str()).collect();
            write!(f, " [{}]", names.join(", "))?;
        }
        if let Some(ref abort) = self.aborted {
            write!(f, " aborted_at={} skipped={}", abort.step, abort.skipped)?;
        }
        Ok(())
    }
}
