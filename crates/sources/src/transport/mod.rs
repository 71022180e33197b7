pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use symbiotic_types::error::SourceError;
use url::Url;

/// A generic transport for sending JSON-RPC requests.
///
/// The target URL is an argument rather than transport state so that
/// the callers can rotate across endpoints without rebuilding clients.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a JSON-RPC request to `url` and returns the raw response.
    async fn send(&self, url: &Url, req: &JsonRpcRequest) -> Result<JsonRpcResponse, SourceError>;
}

/// Represents a JSON-RPC request object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: serde_json::Value,
    pub id: u64,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self { jsonrpc: "2.0", method: method.into(), params, id: 1 }
    }
}

/// Represents a JSON-RPC response object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<JsonRpcError>,
    pub id: u64,
}

impl JsonRpcResponse {
    /// A successful response wrapping `result`.
    pub fn ok(result: serde_json::Value) -> Self {
        Self { jsonrpc: "2.0".to_owned(), result: Some(result), error: None, id: 1 }
    }

    /// An error response with the given code and message.
    pub fn err(code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_owned(),
            result: None,
            error: Some(JsonRpcError { code, message: message.into() }),
            id: 1,
        }
    }
}

/// Represents a JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}
