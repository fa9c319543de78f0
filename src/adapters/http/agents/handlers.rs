//! HTTP handlers for the agent relay endpoints.
//!
//! These handlers connect axum routes to the application layer. Every
//! upstream failure maps to a 500 whose message is the platform's own error
//! text, matching the relay's report-verbatim policy.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::Json;
use futures::{Stream, StreamExt};

use crate::application::handlers::agents::{
    GetResponseCommand, GetResponseHandler, ListAgentsHandler, StreamResponseCommand,
    StreamResponseHandler,
};
use crate::ports::{AgentPlatform, PlatformError};

use super::dto::{
    AgentListResponse, AgentQuery, AgentReplyResponse, ErrorResponse, StreamEventPayload,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for the relay endpoints.
#[derive(Clone)]
pub struct AgentsAppState {
    pub platform: Arc<dyn AgentPlatform>,
}

impl AgentsAppState {
    pub fn new(platform: Arc<dyn AgentPlatform>) -> Self {
        Self { platform }
    }

    pub fn list_agents_handler(&self) -> ListAgentsHandler {
        ListAgentsHandler::new(self.platform.clone())
    }

    pub fn get_response_handler(&self) -> GetResponseHandler {
        GetResponseHandler::new(self.platform.clone())
    }

    pub fn stream_response_handler(&self) -> StreamResponseHandler {
        StreamResponseHandler::new(self.platform.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// List all available agents.
///
/// GET /list_agents
pub async fn list_agents(
    State(state): State<AgentsAppState>,
) -> Result<Json<AgentListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let agents = state
        .list_agents_handler()
        .handle()
        .await
        .map_err(internal_error)?;

    Ok(Json(AgentListResponse {
        agents: agents.into_iter().map(Into::into).collect(),
    }))
}

/// Send a message and return the complete answer.
///
/// POST /get_response?message&agent_id&thread_id?
pub async fn get_response(
    State(state): State<AgentsAppState>,
    Query(params): Query<AgentQuery>,
) -> Result<Json<AgentReplyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let reply = state
        .get_response_handler()
        .handle(GetResponseCommand {
            message: params.message,
            agent_id: params.agent_id,
            thread_id: params.thread_id,
        })
        .await
        .map_err(internal_error)?;

    Ok(Json(AgentReplyResponse::from(reply)))
}

/// Send a message and stream the regrouped answer as server-sent events.
///
/// POST /stream_response?message&agent_id&thread_id?
pub async fn stream_response(
    State(state): State<AgentsAppState>,
    Query(params): Query<AgentQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, (StatusCode, Json<ErrorResponse>)>
{
    let chunks = state
        .stream_response_handler()
        .handle(StreamResponseCommand {
            message: params.message,
            agent_id: params.agent_id,
            thread_id: params.thread_id,
        })
        .await
        .map_err(internal_error)?;

    let events = chunks.map(|chunk| match chunk {
        Ok(chunk) => Event::default().json_data(StreamEventPayload::from(chunk)),
        Err(err) => {
            // Headers are already committed; report the failure in-band and
            // let the stream end.
            tracing::error!("Upstream stream failed mid-response: {}", err);
            Event::default()
                .event("error")
                .json_data(ErrorResponse::internal(err.detail()))
        }
    });

    Ok(Sse::new(events))
}

fn internal_error(err: PlatformError) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!("Upstream request failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(err.detail())),
    )
}
