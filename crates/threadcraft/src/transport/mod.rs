//! The network boundary: one JSON POST per generation flow.
//!
//! The core never talks to reqwest directly; it goes through [`Transport`]
//! so tests can script responses and embedders can swap the client.

pub mod http;
pub mod scripted;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpTransport;
pub use scripted::ScriptedTransport;

/// Remote generation flows exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Analyze,
    Research,
    Ideation,
    Generate,
    Edit,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Analyze => "analyze",
            Endpoint::Research => "research",
            Endpoint::Ideation => "ideation",
            Endpoint::Generate => "generate",
            Endpoint::Edit => "edit",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What came back from the service, before any interpretation.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub data: Option<serde_json::Value>,
    pub message: String,
}

impl TransportResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            status: 200,
            data: Some(data),
            message: "OK".to_string(),
        }
    }

    pub fn status(status: u16, message: &str) -> Self {
        Self {
            status,
            data: None,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Request to '{endpoint}' failed: {message}")]
    Request { endpoint: Endpoint, message: String },

    #[error("Response from '{endpoint}' is not valid JSON: {message}")]
    Decode { endpoint: Endpoint, message: String },
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(
        &self,
        endpoint: Endpoint,
        body: serde_json::Value,
    ) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn invoke(
        &self,
        endpoint: Endpoint,
        body: serde_json::Value,
    ) -> Result<TransportResponse, TransportError> {
        (**self).invoke(endpoint, body).await
    }
}
