//! JSON-over-HTTP plumbing shared by the agent and expert adapters

use council_application::InvokeError;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Thin wrapper over [`reqwest::Client`] that maps every failure into an
/// [`InvokeError`] the orchestrator knows how to handle.
#[derive(Debug, Clone)]
pub struct JsonEndpointClient {
    client: reqwest::Client,
    base_url: String,
}

impl JsonEndpointClient {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!(
                "constitutional-council/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, InvokeError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
            return Err(InvokeError::Timeout);
        }

        let text = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(InvokeError::Failed(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                url,
                text.trim()
            )));
        }

        serde_json::from_str(&text).map_err(|e| InvokeError::Malformed {
            detail: e.to_string(),
            payload: text,
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> InvokeError {
    if e.is_timeout() {
        InvokeError::Timeout
    } else {
        InvokeError::Failed(e.to_string())
    }
}
