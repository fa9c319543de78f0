//! GetResponseHandler - blocking single-answer relay.

use std::sync::Arc;

use crate::ports::{AgentMessageRequest, AgentPlatform, AgentReply, PlatformError};

/// Command to send a message and wait for the complete answer.
#[derive(Debug, Clone)]
pub struct GetResponseCommand {
    /// The user's message text.
    pub message: String,
    /// Target agent identifier.
    pub agent_id: String,
    /// Optional thread id to continue conversation context.
    pub thread_id: Option<String>,
}

/// Handler for the blocking request/response mode.
pub struct GetResponseHandler {
    platform: Arc<dyn AgentPlatform>,
}

impl GetResponseHandler {
    pub fn new(platform: Arc<dyn AgentPlatform>) -> Self {
        Self { platform }
    }

    pub async fn handle(&self, cmd: GetResponseCommand) -> Result<AgentReply, PlatformError> {
        let request =
            AgentMessageRequest::new(cmd.message, cmd.agent_id).with_thread_id(cmd.thread_id);
        self.platform.send_message(request).await
    }
}
