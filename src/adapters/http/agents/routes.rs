//! Axum routes for the agent relay endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{get_response, list_agents, stream_response, AgentsAppState};

/// Creates the relay route set.
///
/// Endpoints:
/// - GET /list_agents - list available agents
/// - POST /get_response - blocking single answer
/// - POST /stream_response - server-sent-event stream of regrouped answers
pub fn agent_routes() -> Router<AgentsAppState> {
    Router::new()
        .route("/list_agents", get(list_agents))
        .route("/get_response", post(get_response))
        .route("/stream_response", post(stream_response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_routes_creates_valid_router() {
        let _routes = agent_routes();
    }
}
