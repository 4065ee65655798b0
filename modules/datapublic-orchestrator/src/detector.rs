use tracing::info;

use datapublic_common::{AppConfig, DataPublicError, DispatchTarget, Result};
use github_dispatch::DispatchRequest;

use crate::dispatch::backend::DispatchBackend;
use crate::step::{Runnable, StepFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// Probe found new data and the dispatch was accepted.
    Dispatched,
    /// Probe found nothing new; no request was made.
    NoNewData,
}

/// Checks one upstream source and, if it changed, asks the remote
/// automation API to start a rebuild.
pub struct ChangeDetector {
    credentials: AppConfig,
    target: DispatchTarget,
    probe: Box<dyn Runnable>,
    backend: Box<dyn DispatchBackend>,
}

impl ChangeDetector {
    pub fn new(
        credentials: AppConfig,
        target: DispatchTarget,
        probe: Box<dyn Runnable>,
        backend: Box<dyn DispatchBackend>,
    ) -> Self {
        Self {
            credentials,
            target,
            probe,
            backend,
        }
    }

    pub async fn run(&self) -> Result<DetectionOutcome> {
        // Credential first: nothing touches the network without it.
        let token = self.credentials.require_token()?;

        info!(probe = %self.probe.name(), "Checking for new data");
        match self.probe.run().await {
            Ok(()) => {}
            Err(StepFailure::Exit { code }) => {
                info!(code, "Probe reported no new data");
                println!("No new data found, not triggering a build.");
                return Ok(DetectionOutcome::NoNewData);
            }
            Err(failure) => {
                return Err(DataPublicError::Probe(format!(
                    "{}: {failure}",
                    self.probe.name()
                )));
            }
        }

        let request = DispatchRequest {
            url: self.target.url().to_string(),
            token: token.to_string(),
            payload: self.target.payload(),
            accept: self.target.accept().map(str::to_string),
        };

        info!(url = %request.url, "New data found, dispatching");
        self.backend.dispatch(&request).await?;
        println!("New data found, dispatched a build request to {}", request.url);
        Ok(DetectionOutcome::Dispatched)
    }
}
