pub mod error;
pub mod types;

pub use error::{DispatchError, Result};
pub use types::{DispatchPayload, DispatchRequest, GITHUB_V3_ACCEPT};

use std::time::Duration;

const USER_AGENT: &str = concat!("datapublic-orchestrator/", env!("CARGO_PKG_VERSION"));

pub struct DispatchClient {
    client: reqwest::Client,
}

impl DispatchClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Use a caller-supplied HTTP client (shared pools, custom timeouts).
    pub fn with_http(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issue one authenticated dispatch POST. GitHub answers 204 on success;
    /// any non-2xx status is returned as [`DispatchError::Api`]. No retries.
    pub async fn send(&self, request: &DispatchRequest) -> Result<()> {
        let mut builder = self
            .client
            .post(&request.url)
            .bearer_auth(&request.token)
            .json(&request.payload);
        if let Some(ref accept) = request.accept {
            builder = builder.header(reqwest::header::ACCEPT, accept);
        }

        tracing::debug!(url = %request.url, "Sending dispatch request");
        let resp = builder.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DispatchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(url = %request.url, status = status.as_u16(), "Dispatch accepted");
        Ok(())
    }
}
