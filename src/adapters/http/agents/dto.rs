//! HTTP DTOs for the agent relay endpoints.
//!
//! These types decouple the HTTP API from port and domain types.

use serde::{Deserialize, Serialize};

use crate::domain::streaming::AnswerChunk;
use crate::ports::{AgentReply, AgentSummary};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query parameters shared by the relay endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentQuery {
    pub message: String,
    pub agent_id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for the agent listing.
#[derive(Debug, Clone, Serialize)]
pub struct AgentListResponse {
    pub agents: Vec<AgentSummaryDto>,
}

/// One agent in the listing response.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummaryDto {
    pub agent_id: String,
    pub name: String,
}

impl From<AgentSummary> for AgentSummaryDto {
    fn from(summary: AgentSummary) -> Self {
        Self {
            agent_id: summary.agent_id,
            name: summary.name,
        }
    }
}

/// Response for the blocking single-answer endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReplyResponse {
    pub response: String,
    pub thread_id: String,
}

impl From<AgentReply> for AgentReplyResponse {
    fn from(reply: AgentReply) -> Self {
        Self {
            response: reply.answer,
            thread_id: reply.thread_id,
        }
    }
}

/// Payload of one server-sent event on the streaming endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StreamEventPayload {
    pub answer: String,
    pub thread_id: String,
}

impl From<AnswerChunk> for StreamEventPayload {
    fn from(chunk: AnswerChunk) -> Self {
        Self {
            answer: chunk.answer,
            thread_id: chunk.thread_id,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
