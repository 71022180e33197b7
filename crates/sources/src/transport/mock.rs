//! Scripted transport for tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use symbiotic_types::error::SourceError;
use url::Url;

use super::{JsonRpcRequest, JsonRpcResponse, Transport};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(JsonRpcResponse),
    /// Simulates a network-level failure.
    TransportError(String),
}

/// Transport that replays a scripted queue of replies and records every
/// request it saw, including the endpoint it was sent to.
#[derive(Default, Clone)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<(Url, JsonRpcRequest)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, result: serde_json::Value) -> &Self {
        self.replies.lock().unwrap().push_back(MockReply::Response(JsonRpcResponse::ok(result)));
        self
    }

    pub fn push_rpc_error(&self, code: i64, message: impl Into<String>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Response(JsonRpcResponse::err(code, message)));
        self
    }

    pub fn push_transport_error(&self, message: impl Into<String>) -> &Self {
        self.replies.lock().unwrap().push_back(MockReply::TransportError(message.into()));
        self
    }

    /// Requests recorded so far, in order.
    pub fn requests(&self) -> Vec<(Url, JsonRpcRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, url: &Url, req: &JsonRpcRequest) -> Result<JsonRpcResponse, SourceError> {
        self.requests.lock().unwrap().push((url.clone(), req.clone()));

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Response(resp)) => Ok(resp),
            Some(MockReply::TransportError(msg)) => Err(SourceError::Transport(msg)),
            None => Err(SourceError::Transport("mock transport exhausted".to_owned())),
        }
    }
}
