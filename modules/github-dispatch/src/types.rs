use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accept header GitHub expects on workflow dispatch calls.
pub const GITHUB_V3_ACCEPT: &str = "application/vnd.github.v3+json";

/// JSON body of a dispatch call.
///
/// Serializes untagged, so the wire shape is exactly one of
/// `{"event_type": ".."}` or `{"ref": "..", "inputs": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DispatchPayload {
    /// `POST /repos/{owner}/{repo}/dispatches`
    RepositoryEvent { event_type: String },
    /// `POST /repos/{owner}/{repo}/actions/workflows/{file}/dispatches`
    Workflow {
        #[serde(rename = "ref")]
        git_ref: String,
        inputs: BTreeMap<String, String>,
    },
}

impl DispatchPayload {
    pub fn repository_event(event_type: impl Into<String>) -> Self {
        Self::RepositoryEvent {
            event_type: event_type.into(),
        }
    }

    pub fn workflow(git_ref: impl Into<String>, inputs: BTreeMap<String, String>) -> Self {
        Self::Workflow {
            git_ref: git_ref.into(),
            inputs,
        }
    }
}

/// A fully resolved dispatch call: where, as whom, and what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub url: String,
    pub token: String,
    pub payload: DispatchPayload,
    /// Explicit `Accept` header. Omitted from the request when `None`.
    pub accept: Option<String>,
}
