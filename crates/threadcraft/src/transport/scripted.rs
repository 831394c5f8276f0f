//! In-memory transport replaying canned replies, for tests and demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::invoker::wrap_result_text;

use super::{Endpoint, Transport, TransportError, TransportResponse};

/// A request the scripted transport received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub body: serde_json::Value,
}

enum Reply {
    Response(TransportResponse),
    NetworkFailure(String),
}

/// Replays queued replies in FIFO order and records every call.
///
/// A call whose endpoint does not match the next queued reply (or arrives
/// with nothing queued) fails as a network error, so a mis-sequenced
/// pipeline shows up as a rollback rather than a hang.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<(Endpoint, Reply)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a 200 response whose result path holds `text`.
    pub fn reply_text(self, endpoint: Endpoint, text: &str) -> Self {
        self.reply(endpoint, TransportResponse::ok(wrap_result_text(endpoint, text)))
    }

    /// Queues an arbitrary response.
    pub fn reply(self, endpoint: Endpoint, response: TransportResponse) -> Self {
        self.push(endpoint, Reply::Response(response));
        self
    }

    /// Queues a network-level failure.
    pub fn fail(self, endpoint: Endpoint, message: &str) -> Self {
        self.push(endpoint, Reply::NetworkFailure(message.to_string()));
        self
    }

    /// Appends everything queued on `other` after this script's replies.
    pub fn then(self, other: ScriptedTransport) -> Self {
        let queued = other
            .replies
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for (endpoint, reply) in queued {
            self.push(endpoint, reply);
        }
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn pending(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn push(&self, endpoint: Endpoint, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back((endpoint, reply));
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn invoke(
        &self,
        endpoint: Endpoint,
        body: serde_json::Value,
    ) -> Result<TransportResponse, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                endpoint,
                body: body.clone(),
            });
        }

        let next = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| {
                let matches = replies.front().is_some_and(|(e, _)| *e == endpoint);
                if matches {
                    replies.pop_front()
                } else {
                    None
                }
            });

        match next {
            Some((_, Reply::Response(response))) => Ok(response),
            Some((_, Reply::NetworkFailure(message))) => {
                Err(TransportError::Request { endpoint, message })
            }
            None => Err(TransportError::Request {
                endpoint,
                message: "no scripted reply queued".to_string(),
            }),
        }
    }
}
