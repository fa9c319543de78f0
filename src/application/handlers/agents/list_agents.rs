//! ListAgentsHandler - query handler for the upstream agent listing.

use std::sync::Arc;

use crate::ports::{AgentPlatform, AgentSummary, PlatformError};

/// Handler for retrieving the platform's agent listing.
pub struct ListAgentsHandler {
    platform: Arc<dyn AgentPlatform>,
}

impl ListAgentsHandler {
    pub fn new(platform: Arc<dyn AgentPlatform>) -> Self {
        Self { platform }
    }

    pub async fn handle(&self) -> Result<Vec<AgentSummary>, PlatformError> {
        let agents = self.platform.list_agents().await?;
        tracing::debug!("Listed {} agents", agents.len());
        Ok(agents)
    }
}
