//! Agent Platform Port - interface to the upstream conversational-agent service.
//!
//! Abstracts the remote platform behind a trait so handlers and tests never
//! couple to the concrete HTTP client. Implementations translate between the
//! platform wire format and the gateway's value types.
//!
//! # Design
//!
//! - One method per caller-facing operation: listing, a blocking single
//!   answer, and a streaming answer.
//! - Streaming returns raw [`AnswerFragment`]s; regrouping into readable
//!   chunks is the domain's job, not the platform's.
//! - Failures carry the raw upstream body so callers see the platform's own
//!   error text verbatim.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::domain::streaming::AnswerFragment;

/// Lazy sequence of decoded answer fragments from one streamed run.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<AnswerFragment, PlatformError>> + Send>>;

/// Port for the upstream agent platform.
#[async_trait]
pub trait AgentPlatform: Send + Sync {
    /// Lists the agents configured on the platform.
    async fn list_agents(&self) -> Result<Vec<AgentSummary>, PlatformError>;

    /// Sends a message and waits for the first complete answer.
    async fn send_message(&self, request: AgentMessageRequest)
        -> Result<AgentReply, PlatformError>;

    /// Sends a message and returns the incremental answer stream.
    ///
    /// Any non-success upstream status surfaces as an error here, before a
    /// single fragment is produced.
    async fn stream_message(
        &self,
        request: AgentMessageRequest,
    ) -> Result<FragmentStream, PlatformError>;
}

/// One row of the platform's agent listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    /// Unique identifier of the agent.
    pub agent_id: String,
    /// Display name of the agent.
    pub name: String,
}

/// A message bound for a specific agent, optionally continuing a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMessageRequest {
    /// The user's message text.
    pub message: String,
    /// Target agent identifier.
    pub agent_id: String,
    /// Opaque upstream thread id; `None` starts a fresh conversation.
    pub thread_id: Option<String>,
}

impl AgentMessageRequest {
    pub fn new(message: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            agent_id: agent_id.into(),
            thread_id: None,
        }
    }

    /// Sets the thread id to continue an existing conversation.
    pub fn with_thread_id(mut self, thread_id: Option<String>) -> Self {
        self.thread_id = thread_id;
        self
    }
}

/// A complete (non-streamed) answer from an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentReply {
    /// The agent's full reply text.
    pub answer: String,
    /// Thread id associated with the conversation.
    pub thread_id: String,
}

impl AgentReply {
    pub fn new(answer: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            thread_id: thread_id.into(),
        }
    }
}

/// Agent platform errors.
///
/// Deliberately small: the gateway performs no retries and reports every
/// failure to the caller as-is.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    /// Non-success HTTP status from the platform; carries the raw body text.
    #[error("upstream returned status {status}: {body}")]
    Upstream {
        /// HTTP status code the platform answered with.
        status: u16,
        /// Raw response body, reported verbatim to callers.
        body: String,
    },

    /// Transport failure before or during a response.
    #[error("network error: {0}")]
    Network(String),

    /// The platform answered with a body the gateway could not decode.
    #[error("parse error: {0}")]
    Parse(String),
}

impl PlatformError {
    /// Creates an upstream-status error.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Detail text reported to callers: the raw upstream body for status
    /// failures, the display form otherwise.
    pub fn detail(&self) -> String {
        match self {
            Self::Upstream { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_thread_id() {
        let request = AgentMessageRequest::new("hello", "agent-1")
            .with_thread_id(Some("t-7".to_string()));

        assert_eq!(request.message, "hello");
        assert_eq!(request.agent_id, "agent-1");
        assert_eq!(request.thread_id.as_deref(), Some("t-7"));
    }

    #[test]
    fn request_defaults_to_fresh_thread() {
        let request = AgentMessageRequest::new("hello", "agent-1");
        assert_eq!(request.thread_id, None);
    }

    #[test]
    fn upstream_detail_is_raw_body() {
        let err = PlatformError::upstream(503, "service melting");
        assert_eq!(err.detail(), "service melting");
        assert_eq!(
            err.to_string(),
            "upstream returned status 503: service melting"
        );
    }

    #[test]
    fn network_detail_uses_display_form() {
        let err = PlatformError::network("connection refused");
        assert_eq!(err.detail(), "network error: connection refused");
    }

    #[test]
    fn agent_summary_round_trips_through_json() {
        let summary = AgentSummary {
            agent_id: "a-1".to_string(),
            name: "Billing".to_string(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"agent_id":"a-1","name":"Billing"}"#);
    }
}
