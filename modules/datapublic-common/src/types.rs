use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use github_dispatch::{DispatchPayload, GITHUB_V3_ACCEPT};

// --- Failure policy ---

/// What the runner does when a step exits unsuccessfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the sequence; no later step runs.
    #[default]
    AbortOnFailure,
    /// Log a warning naming the step and move on.
    WarnAndContinue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbortOnFailure => write!(f, "abort-on-failure"),
            Self::WarnAndContinue => write!(f, "warn-and-continue"),
        }
    }
}

// --- Step and probe descriptors ---

/// One external per-source updater, invoked as a child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub policy: FailurePolicy,
}

impl StepSpec {
    pub fn new(name: &str, program: &str, args: &[&str], policy: FailurePolicy) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            working_dir: None,
            env: BTreeMap::new(),
            policy,
        }
    }

    /// `program arg1 arg2 ...`, for logs and the dry-run plan.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The "is there new upstream data?" check. Exit 0 means yes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl Default for ProbeSpec {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            args: vec![
                "scripts/update_nytimes_data.py".to_string(),
                "--check-for-new-data".to_string(),
            ],
            working_dir: None,
        }
    }
}

// --- Dispatch target ---

pub const DEFAULT_EVENT_TYPE: &str = "update-source-data";
pub const DEFAULT_WORKFLOW_REF: &str = "main";

/// Where a successful probe is announced, and with which body shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DispatchTarget {
    /// Generic `repository_dispatch` event.
    RepositoryEvent { url: String, event_type: String },
    /// `workflow_dispatch` of one workflow file at a ref, with string inputs.
    Workflow {
        url: String,
        #[serde(rename = "ref")]
        git_ref: String,
        #[serde(default = "default_workflow_inputs")]
        inputs: BTreeMap<String, String>,
        #[serde(default = "default_accept")]
        accept: String,
    },
}

impl DispatchTarget {
    pub fn url(&self) -> &str {
        match self {
            Self::RepositoryEvent { url, .. } | Self::Workflow { url, .. } => url.as_str(),
        }
    }

    pub fn payload(&self) -> DispatchPayload {
        match self {
            Self::RepositoryEvent { event_type, .. } => {
                DispatchPayload::repository_event(event_type.clone())
            }
            Self::Workflow {
                git_ref, inputs, ..
            } => DispatchPayload::workflow(git_ref.clone(), inputs.clone()),
        }
    }

    /// API-version accept header; only the workflow variant sends one.
    pub fn accept(&self) -> Option<&str> {
        match self {
            Self::RepositoryEvent { .. } => None,
            Self::Workflow { accept, .. } => Some(accept.as_str()),
        }
    }

    pub fn default_repository_event() -> Self {
        Self::RepositoryEvent {
            url: "https://api.github.com/repos/covid-projections/covid-data-model/dispatches"
                .to_string(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
        }
    }

    pub fn default_workflow() -> Self {
        Self::Workflow {
            url: "https://api.github.com/repos/covid-projections/covid-data-model/actions/workflows/deploy_api.yml/dispatches"
                .to_string(),
            git_ref: DEFAULT_WORKFLOW_REF.to_string(),
            inputs: default_workflow_inputs(),
            accept: default_accept(),
        }
    }
}

impl Default for DispatchTarget {
    fn default() -> Self {
        Self::default_workflow()
    }
}

fn default_workflow_inputs() -> BTreeMap<String, String> {
    BTreeMap::from([("trigger_api_build".to_string(), "true".to_string())])
}

fn default_accept() -> String {
    GITHUB_V3_ACCEPT.to_string()
}
