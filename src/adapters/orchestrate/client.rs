//! Orchestrate client - AgentPlatform implementation for watsonx Orchestrate.
//!
//! Issues the platform's REST calls and adapts the answers to the gateway's
//! port types. Streamed runs go through the event decoder in
//! [`super::events`]; the non-streaming path reads the same stream but stops
//! at the first complete message.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OrchestrateClientConfig::new(api_key, base_url)
//!     .with_timeout(Duration::from_secs(60));
//!
//! let client = OrchestrateClient::new(config);
//! ```

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    AgentMessageRequest, AgentPlatform, AgentReply, AgentSummary, FragmentStream, PlatformError,
};

use super::events;

/// Header carrying the static API key, as named by the Orchestrate API.
const API_KEY_HEADER: &str = "IAM-API_KEY";

/// Configuration for the Orchestrate client.
#[derive(Debug, Clone)]
pub struct OrchestrateClientConfig {
    /// API key sent on every request.
    api_key: Secret<String>,
    /// Instance base URL, up to and including `/v1/orchestrate`.
    pub base_url: String,
    /// Request timeout; also caps the lifetime of a streamed run.
    pub timeout: Duration,
}

impl OrchestrateClientConfig {
    /// Creates a new configuration with the given API key and base URL.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: base_url.into(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Orchestrate API client.
pub struct OrchestrateClient {
    config: OrchestrateClientConfig,
    client: Client,
}

impl OrchestrateClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: OrchestrateClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn agents_url(&self) -> String {
        format!("{}/agents", self.config.base_url)
    }

    fn runs_stream_url(&self) -> String {
        format!("{}/runs/stream", self.config.base_url)
    }

    /// Converts a port request to the platform's run payload.
    fn to_run_request(request: &AgentMessageRequest) -> RunRequest {
        RunRequest {
            message: RunMessage {
                role: "user".to_string(),
                content: request.message.clone(),
            },
            additional_properties: serde_json::Map::new(),
            context: serde_json::Map::new(),
            agent_id: request.agent_id.clone(),
            thread_id: request.thread_id.clone(),
        }
    }

    /// Starts a run against `/runs/stream`.
    async fn post_run(&self, request: &AgentMessageRequest) -> Result<Response, PlatformError> {
        tracing::debug!("Starting run for agent {}", request.agent_id);
        self.client
            .post(self.runs_stream_url())
            .header(API_KEY_HEADER, self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&Self::to_run_request(request))
            .send()
            .await
            .map_err(|e| PlatformError::network(e.to_string()))
    }

    /// Fails with the raw body text on any non-success status.
    async fn ensure_success(response: Response) -> Result<Response, PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PlatformError::upstream(status.as_u16(), body))
    }

    /// The run body as a line stream with transport errors mapped.
    fn body_lines(
        response: Response,
    ) -> impl futures::Stream<Item = Result<String, PlatformError>> {
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| PlatformError::network(e.to_string())));
        events::lines(bytes)
    }
}

#[async_trait]
impl AgentPlatform for OrchestrateClient {
    async fn list_agents(&self) -> Result<Vec<AgentSummary>, PlatformError> {
        let response = self
            .client
            .get(self.agents_url())
            .header(API_KEY_HEADER, self.config.api_key())
            .send()
            .await
            .map_err(|e| PlatformError::network(e.to_string()))?;
        let response = Self::ensure_success(response).await?;

        let agents: Vec<UpstreamAgent> = response
            .json()
            .await
            .map_err(|e| PlatformError::parse(format!("Failed to parse agent listing: {e}")))?;

        Ok(agents
            .into_iter()
            .map(|agent| AgentSummary {
                agent_id: agent.id,
                name: agent.display_name,
            })
            .collect())
    }

    async fn send_message(
        &self,
        request: AgentMessageRequest,
    ) -> Result<AgentReply, PlatformError> {
        let caller_thread = request.thread_id.clone().unwrap_or_default();

        let response = self.post_run(&request).await?;
        let response = Self::ensure_success(response).await?;

        let mut lines = Box::pin(Self::body_lines(response));
        while let Some(line) = lines.next().await {
            if let Some(reply) = events::decode_created_line(&line?) {
                return Ok(reply);
            }
        }

        // No complete message arrived; answer is empty and the caller's
        // thread id stands.
        Ok(AgentReply::new("", caller_thread))
    }

    async fn stream_message(
        &self,
        request: AgentMessageRequest,
    ) -> Result<FragmentStream, PlatformError> {
        let response = self.post_run(&request).await?;
        let response = Self::ensure_success(response).await?;

        let fragments = Self::body_lines(response).filter_map(|line| async move {
            match line {
                Ok(line) => events::decode_delta_line(&line).map(Ok),
                Err(err) => Some(Err(err)),
            }
        });
        Ok(Box::pin(fragments))
    }
}

// ----- Orchestrate API Types -----

#[derive(Debug, Serialize)]
struct RunRequest {
    message: RunMessage,
    additional_properties: serde_json::Map<String, serde_json::Value>,
    context: serde_json::Map<String, serde_json::Value>,
    agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamAgent {
    id: String,
    display_name: String,
}
