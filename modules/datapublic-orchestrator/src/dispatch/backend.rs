use async_trait::async_trait;

use datapublic_common::Result;
use github_dispatch::DispatchRequest;

/// Pluggable delivery for dispatch requests.
#[async_trait]
pub trait DispatchBackend: Send + Sync {
    /// Deliver one request. Called at most once per detector run.
    async fn dispatch(&self, request: &DispatchRequest) -> Result<()>;
}
