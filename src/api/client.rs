use super::ChatService;
use crate::config::ApiConfig;
use crate::models::{BackendStatus, ChatRequest, GeminiResponse, HealthStatus};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

/// REST client for the GENESIS backend.
///
/// No timeout, retry, or caching is layered on top of the underlying
/// `reqwest::Client`; pass a configured client to `new_with_client` to change
/// transport behaviour.
pub struct GenesisClient {
    client: Client,
    config: ApiConfig,
}

impl GenesisClient {
    pub fn new(config: ApiConfig) -> Self {
        Self::new_with_client(config, Client::new())
    }

    pub fn new_with_client(config: ApiConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Construct a client targeting `GENESIS_API_URL` (or the default).
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    pub fn api_url(&self) -> &str {
        self.config.api_url()
    }

    /// Point subsequent requests at a different backend.
    pub fn set_api_url(&mut self, api_url: impl Into<String>) {
        self.config.set_api_url(api_url);
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.api_url())
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.config.api_url())
    }

    /// Query the backend's `/health` endpoint.
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let url = self.health_url();
        tracing::debug!("Checking backend health at {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to reach backend health endpoint: {}", e);
            e
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend health error (status {}): {}", status, body);
            return Err(Error::Status { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse health response: {}\nBody: {}", e, body);
            Error::Decode(e.to_string())
        })
    }

    /// Online when `/health` answers with a 2xx status, Offline otherwise.
    pub async fn backend_status(&self) -> BackendStatus {
        match self.client.get(self.health_url()).send().await {
            Ok(response) if response.status().is_success() => BackendStatus::Online,
            Ok(response) => {
                tracing::warn!("Backend health returned status {}", response.status());
                BackendStatus::Offline
            }
            Err(e) => {
                tracing::warn!("Backend unreachable: {}", e);
                BackendStatus::Offline
            }
        }
    }
}

#[async_trait]
impl ChatService for GenesisClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<GeminiResponse> {
        let url = self.chat_url();
        tracing::debug!(
            "Sending chat request to {} ({} attachments, session {})",
            url,
            request.attachments.len(),
            request.session_id
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to backend: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend API error (status {}): {}", status, body);
            return Err(Error::Status { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse backend response: {}\nBody: {}", e, body);
            Error::Decode(e.to_string())
        })
    }
}
