use async_trait::async_trait;

use datapublic_common::Result;
use github_dispatch::{DispatchClient, DispatchRequest};

use super::backend::DispatchBackend;

/// Sends dispatch requests to the GitHub REST API.
pub struct GitHubBackend {
    client: DispatchClient,
}

impl GitHubBackend {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: DispatchClient::new()?,
        })
    }

    pub fn with_client(client: DispatchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DispatchBackend for GitHubBackend {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<()> {
        self.client.send(request).await?;
        Ok(())
    }
}
