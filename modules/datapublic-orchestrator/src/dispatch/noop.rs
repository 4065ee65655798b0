use async_trait::async_trait;

use datapublic_common::Result;
use github_dispatch::DispatchRequest;

use super::backend::DispatchBackend;

/// Dry-run backend: logs what would have been sent.
pub struct NoopBackend;

#[async_trait]
impl DispatchBackend for NoopBackend {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<()> {
        let body = serde_json::to_string(&request.payload).unwrap_or_default();
        tracing::info!(url = %request.url, body = %body, "Dry run, dispatch not sent");
        Ok(())
    }
}
