use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::config::schema::{Config, EndpointsConfig};
use crate::sanitize;
use crate::secrets;

use super::{Endpoint, Transport, TransportError, TransportResponse};

/// reqwest-backed transport posting JSON to `{api_url}{endpoint path}`.
pub struct HttpTransport {
    client: Client,
    api_url: String,
    endpoints: EndpointsConfig,
    token: Option<SecretString>,
}

impl HttpTransport {
    pub fn from_config(config: &Config) -> Result<Self, crate::error::ThreadcraftError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        let token = secrets::resolve_token_optional(&config.auth)?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
            token,
        })
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        let path = match endpoint {
            Endpoint::Analyze => &self.endpoints.analyze,
            Endpoint::Research => &self.endpoints.research,
            Endpoint::Ideation => &self.endpoints.ideation,
            Endpoint::Generate => &self.endpoints.generate,
            Endpoint::Edit => &self.endpoints.edit,
        };
        format!("{}{}", self.api_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(
        &self,
        endpoint: Endpoint,
        body: serde_json::Value,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(endpoint);
        debug!(endpoint = %endpoint, url = %sanitize::redact_url(&url), "POST");

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            warn!(endpoint = %endpoint, "Request failed: {}", e);
            TransportError::Request {
                endpoint,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let message = status.canonical_reason().unwrap_or("").to_string();

        // Error pages from proxies are often HTML; the status still matters.
        if !status.is_success() {
            let data = response.json::<serde_json::Value>().await.ok();
            return Ok(TransportResponse {
                status: status.as_u16(),
                data,
                message,
            });
        }

        let data: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| TransportError::Decode {
                    endpoint,
                    message: e.to_string(),
                })?;

        Ok(TransportResponse {
            status: status.as_u16(),
            data: Some(data),
            message,
        })
    }
}
