//! One remote call per stage: shape the payload, send it, pull out the text.
//!
//! The invoker never interprets the text and never retries; a failed call
//! is reported once with its cause and the caller decides what to do.

pub mod slots;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn, Instrument};

use crate::config::schema::SlotsConfig;
use crate::sanitize::{truncate_for_log, MAX_LOG_CHARS};
use crate::transport::{Endpoint, Transport, TransportError};

pub use slots::{input_payload, tweaks_payload, SlotBinding, SlotSource, SlotTable, SlotValues};

/// Status reported for calls that never got an HTTP response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("'{endpoint}' returned status {status}: {message}")]
    NonSuccessStatus {
        endpoint: Endpoint,
        status: u16,
        message: String,
    },

    #[error("'{endpoint}' returned an empty result")]
    EmptyResult { endpoint: Endpoint },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Cannot call '{endpoint}' without {input}")]
    MissingInput {
        endpoint: Endpoint,
        input: &'static str,
    },

    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl InvokeError {
    /// Short cause label for notifications and logs.
    pub fn cause(&self) -> &'static str {
        match self {
            InvokeError::NonSuccessStatus { .. } => "non-200 status",
            InvokeError::EmptyResult { .. } => "empty result",
            InvokeError::Transport(_) => "transport error",
            InvokeError::MissingInput { .. } | InvokeError::Encode(_) => "invalid request",
        }
    }

    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            InvokeError::NonSuccessStatus { endpoint, .. }
            | InvokeError::EmptyResult { endpoint }
            | InvokeError::MissingInput { endpoint, .. } => Some(*endpoint),
            InvokeError::Transport(TransportError::Request { endpoint, .. })
            | InvokeError::Transport(TransportError::Decode { endpoint, .. }) => Some(*endpoint),
            InvokeError::Transport(TransportError::Client(_)) | InvokeError::Encode(_) => None,
        }
    }

    /// Status as seen by the caller; network failures read as 500.
    pub fn status(&self) -> Option<u16> {
        match self {
            InvokeError::NonSuccessStatus { status, .. } => Some(*status),
            InvokeError::Transport(_) => Some(TRANSPORT_FAILURE_STATUS),
            _ => None,
        }
    }
}

/// JSON pointer to the generated text inside a flow response.
pub fn result_pointer(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Analyze | Endpoint::Research => "/outputs/0/outputs/0/results/message/text",
        Endpoint::Ideation | Endpoint::Generate | Endpoint::Edit => {
            "/outputs/0/outputs/0/results/message/data/text"
        }
    }
}

/// Builds a response body carrying `text` where [`result_pointer`] looks.
pub fn wrap_result_text(endpoint: Endpoint, text: &str) -> Value {
    let message = match endpoint {
        Endpoint::Analyze | Endpoint::Research => json!({ "text": text }),
        Endpoint::Ideation | Endpoint::Generate | Endpoint::Edit => {
            json!({ "data": { "text": text } })
        }
    };
    json!({ "outputs": [{ "outputs": [{ "results": { "message": message } }] }] })
}

/// Non-empty result text at `endpoint`'s result path, if any.
pub fn extract_result_text(endpoint: Endpoint, data: &Value) -> Option<&str> {
    data.pointer(result_pointer(endpoint))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

pub struct StageInvoker<T: Transport> {
    transport: T,
    slots: SlotTable,
}

impl<T: Transport> StageInvoker<T> {
    pub fn new(transport: T, slots: &SlotsConfig) -> Self {
        Self {
            transport,
            slots: SlotTable::from_config(slots),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn slot_table(&self) -> &SlotTable {
        &self.slots
    }

    /// Sends the source text to the analyze flow.
    pub async fn analyze(&self, source_text: &str) -> Result<String, InvokeError> {
        self.call(Endpoint::Analyze, input_payload(source_text)).await
    }

    /// Sends the serialized analysis to the research flow.
    pub async fn research(&self, analysis: &Value) -> Result<String, InvokeError> {
        self.call(Endpoint::Research, input_payload(&analysis.to_string()))
            .await
    }

    pub async fn ideation(&self, values: &SlotValues<'_>) -> Result<String, InvokeError> {
        self.call_with_tweaks(Endpoint::Ideation, values).await
    }

    pub async fn generate(&self, values: &SlotValues<'_>) -> Result<String, InvokeError> {
        self.call_with_tweaks(Endpoint::Generate, values).await
    }

    pub async fn edit(&self, values: &SlotValues<'_>) -> Result<String, InvokeError> {
        self.call_with_tweaks(Endpoint::Edit, values).await
    }

    async fn call_with_tweaks(
        &self,
        endpoint: Endpoint,
        values: &SlotValues<'_>,
    ) -> Result<String, InvokeError> {
        let body = tweaks_payload(&self.slots, endpoint, values)?;
        self.call(endpoint, body).await
    }

    async fn call(&self, endpoint: Endpoint, body: Value) -> Result<String, InvokeError> {
        let span = tracing::info_span!("invoke", endpoint = %endpoint);
        async move {
            debug!(
                "Request body: {}",
                truncate_for_log(&body.to_string(), MAX_LOG_CHARS)
            );

            let response = self.transport.invoke(endpoint, body).await.map_err(|e| {
                warn!("Transport failure: {}", e);
                InvokeError::Transport(e)
            })?;

            if response.status != 200 {
                warn!(status = response.status, "Non-success status");
                return Err(InvokeError::NonSuccessStatus {
                    endpoint,
                    status: response.status,
                    message: response.message,
                });
            }

            let text = response
                .data
                .as_ref()
                .and_then(|data| extract_result_text(endpoint, data))
                .ok_or_else(|| {
                    warn!("No result text at {}", result_pointer(endpoint));
                    InvokeError::EmptyResult { endpoint }
                })?;

            debug!("Raw output: {}", truncate_for_log(text, MAX_LOG_CHARS));
            Ok(text.to_string())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ScriptedTransport, TransportResponse};

    fn invoker(transport: ScriptedTransport) -> StageInvoker<ScriptedTransport> {
        StageInvoker::new(transport, &SlotsConfig::default())
    }

    #[test]
    fn test_result_paths_differ_by_endpoint() {
        let analyze = wrap_result_text(Endpoint::Analyze, "a");
        let edit = wrap_result_text(Endpoint::Edit, "e");

        assert_eq!(
            analyze["outputs"][0]["outputs"][0]["results"]["message"]["text"],
            "a"
        );
        assert_eq!(
            edit["outputs"][0]["outputs"][0]["results"]["message"]["data"]["text"],
            "e"
        );
        assert_eq!(extract_result_text(Endpoint::Analyze, &analyze), Some("a"));
        assert_eq!(extract_result_text(Endpoint::Generate, &analyze), None);
        assert_eq!(extract_result_text(Endpoint::Edit, &edit), Some("e"));
    }

    #[test]
    fn test_empty_text_is_not_a_result() {
        let data = wrap_result_text(Endpoint::Research, "");
        assert_eq!(extract_result_text(Endpoint::Research, &data), None);
    }

    #[tokio::test]
    async fn test_analyze_sends_input_value() {
        let invoker = invoker(ScriptedTransport::new().reply_text(Endpoint::Analyze, "{}"));

        let text = invoker.analyze("source text").await.unwrap();

        assert_eq!(text, "{}");
        let calls = invoker.transport().calls();
        assert_eq!(calls[0].body, json!({"input_value": "source text"}));
    }

    #[tokio::test]
    async fn test_research_sends_serialized_analysis() {
        let invoker = invoker(ScriptedTransport::new().reply_text(Endpoint::Research, "r"));

        invoker.research(&json!({"k": "v"})).await.unwrap();

        let calls = invoker.transport().calls();
        assert_eq!(calls[0].body, json!({"input_value": "{\"k\":\"v\"}"}));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let invoker = invoker(
            ScriptedTransport::new()
                .reply(Endpoint::Analyze, TransportResponse::status(502, "Bad Gateway")),
        );

        let err = invoker.analyze("x").await.unwrap_err();

        assert_eq!(err.cause(), "non-200 status");
        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn test_success_status_without_text_is_empty_result() {
        let invoker = invoker(
            ScriptedTransport::new()
                .reply(Endpoint::Analyze, TransportResponse::ok(json!({"outputs": []}))),
        );

        let err = invoker.analyze("x").await.unwrap_err();

        assert!(matches!(err, InvokeError::EmptyResult { endpoint: Endpoint::Analyze }));
        assert_eq!(err.cause(), "empty result");
    }

    #[tokio::test]
    async fn test_transport_failure_reads_as_500() {
        let invoker = invoker(ScriptedTransport::new().fail(Endpoint::Analyze, "refused"));

        let err = invoker.analyze("x").await.unwrap_err();

        assert_eq!(err.cause(), "transport error");
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_missing_input_makes_no_call() {
        let invoker = invoker(ScriptedTransport::new());

        let err = invoker.generate(&SlotValues::default()).await.unwrap_err();

        assert!(matches!(err, InvokeError::MissingInput { .. }));
        assert_eq!(invoker.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_retry_after_failure() {
        let invoker = invoker(
            ScriptedTransport::new()
                .reply(Endpoint::Analyze, TransportResponse::status(500, "Internal Server Error"))
                .reply_text(Endpoint::Analyze, "{}"),
        );

        assert!(invoker.analyze("x").await.is_err());
        assert_eq!(invoker.transport().call_count(), 1);
        assert_eq!(invoker.transport().pending(), 1);
    }
}
