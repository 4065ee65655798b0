use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use datapublic_common::{ProbeSpec, StepSpec};

/// Why a runnable did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepFailure {
    #[error("exited with status {code}")]
    Exit { code: i32 },

    #[error("terminated by signal")]
    Signal,

    #[error("failed to start: {message}")]
    Spawn { message: String },
}

/// Something the orchestrator can run to completion and get a yes/no from.
/// Update steps and the new-data probe both implement this.
#[async_trait]
pub trait Runnable: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> Result<(), StepFailure>;
}

/// A [`Runnable`] backed by an external process. Stdio is inherited, so the
/// collaborator's own output lands on the console as-is.
#[derive(Debug, Clone)]
pub struct CommandStep {
    name: String,
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl CommandStep {
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }

    pub fn from_spec(spec: &StepSpec) -> Self {
        Self {
            name: spec.name.clone(),
            program: spec.program.clone(),
            args: spec.args.clone(),
            working_dir: spec.working_dir.clone(),
            env: spec.env.clone(),
        }
    }

    pub fn probe(spec: &ProbeSpec) -> Self {
        Self {
            name: "new-data-probe".to_string(),
            program: spec.program.clone(),
            args: spec.args.clone(),
            working_dir: spec.working_dir.clone(),
            env: BTreeMap::new(),
        }
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl Runnable for CommandStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<(), StepFailure> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args).envs(&self.env);
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(step = %self.name, program = %self.program, args = ?self.args, "Spawning");
        let status = cmd.status().await.map_err(|e| StepFailure::Spawn {
            message: format!("{}: {e}", self.program),
        })?;

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(StepFailure::Exit { code }),
            None => Err(StepFailure::Signal),
        }
    }
}
