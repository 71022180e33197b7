use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use symbiotic_types::error::SourceError;
use url::Url;

use super::{JsonRpcRequest, JsonRpcResponse, Transport};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client for EL JSON-RPC");
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, url: &Url, req: &JsonRpcRequest) -> Result<JsonRpcResponse, SourceError> {
        let resp = self
            .client
            .post(url.clone())
            .json(req)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let resp_bytes = resp.bytes().await.map_err(|e| SourceError::Transport(e.to_string()))?;
        serde_json::from_slice(&resp_bytes)
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))
    }
}
