//! In-memory doubles for the process and HTTP seams.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use datapublic_common::{DataPublicError, Result};
use github_dispatch::DispatchRequest;

use crate::dispatch::backend::DispatchBackend;
use crate::step::{Runnable, StepFailure};

/// Shared, ordered log of which scripted steps ran.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }
}

/// A step whose result is fixed up front.
pub struct ScriptedStep {
    name: String,
    result: std::result::Result<(), StepFailure>,
    journal: Journal,
}

impl ScriptedStep {
    pub fn ok(name: &str, journal: &Journal) -> Self {
        Self::with_result(name, Ok(()), journal)
    }

    pub fn exits(name: &str, code: i32, journal: &Journal) -> Self {
        Self::with_result(name, Err(StepFailure::Exit { code }), journal)
    }

    pub fn unspawnable(name: &str, journal: &Journal) -> Self {
        Self::with_result(
            name,
            Err(StepFailure::Spawn {
                message: "No such file or directory (os error 2)".to_string(),
            }),
            journal,
        )
    }

    pub fn with_result(
        name: &str,
        result: std::result::Result<(), StepFailure>,
        journal: &Journal,
    ) -> Self {
        Self {
            name: name.to_string(),
            result,
            journal: journal.clone(),
        }
    }
}

#[async_trait]
impl Runnable for ScriptedStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> std::result::Result<(), StepFailure> {
        self.journal.push(&self.name);
        self.result.clone()
    }
}

/// Backend that keeps every request instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    requests: Arc<Mutex<Vec<DispatchRequest>>>,
    fail_with: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the request, then report it as rejected.
    pub fn failing(message: &str) -> Self {
        Self {
            requests: Arc::default(),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn requests(&self) -> Vec<DispatchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DispatchBackend for RecordingBackend {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        match self.fail_with {
            Some(ref message) => Err(DataPublicError::Dispatch(message.clone())),
            None => Ok(()),
        }
    }
}
