//! Mock agent platform for testing.
//!
//! Configurable implementation of the [`AgentPlatform`] port so handler and
//! HTTP tests run without a live upstream.
//!
//! # Example
//!
//! ```ignore
//! let platform = MockAgentPlatform::new()
//!     .with_fragments(vec![AnswerFragment::new("Hi ", "t1")])
//!     .with_reply(AgentReply::new("Hi there.", "t1"));
//! ```

use async_trait::async_trait;
use futures::stream;
use std::sync::{Arc, Mutex};

use crate::domain::streaming::AnswerFragment;
use crate::ports::{
    AgentMessageRequest, AgentPlatform, AgentReply, AgentSummary, FragmentStream, PlatformError,
};

/// Failure to inject into every mock call.
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Simulate a non-success upstream status with a raw body.
    Upstream { status: u16, body: String },
    /// Simulate a transport failure.
    Network(String),
}

impl From<MockFailure> for PlatformError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::Upstream { status, body } => PlatformError::upstream(status, body),
            MockFailure::Network(message) => PlatformError::network(message),
        }
    }
}

/// Mock platform returning pre-configured answers.
#[derive(Debug, Clone, Default)]
pub struct MockAgentPlatform {
    agents: Vec<AgentSummary>,
    reply: AgentReply,
    fragments: Vec<AnswerFragment>,
    failure: Option<MockFailure>,
    calls: Arc<Mutex<Vec<AgentMessageRequest>>>,
}

impl MockAgentPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the agent listing.
    pub fn with_agents(mut self, agents: Vec<AgentSummary>) -> Self {
        self.agents = agents;
        self
    }

    /// Sets the non-streaming reply.
    pub fn with_reply(mut self, reply: AgentReply) -> Self {
        self.reply = reply;
        self
    }

    /// Sets the fragments yielded by the streaming path.
    pub fn with_fragments(mut self, fragments: Vec<AnswerFragment>) -> Self {
        self.fragments = fragments;
        self
    }

    /// Makes every call fail with the given failure.
    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// Message requests received so far, in order.
    pub fn calls(&self) -> Vec<AgentMessageRequest> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }

    fn check_failure(&self) -> Result<(), PlatformError> {
        match &self.failure {
            Some(failure) => Err(failure.clone().into()),
            None => Ok(()),
        }
    }

    fn record(&self, request: AgentMessageRequest) {
        self.calls.lock().expect("mock lock poisoned").push(request);
    }
}

#[async_trait]
impl AgentPlatform for MockAgentPlatform {
    async fn list_agents(&self) -> Result<Vec<AgentSummary>, PlatformError> {
        self.check_failure()?;
        Ok(self.agents.clone())
    }

    async fn send_message(
        &self,
        request: AgentMessageRequest,
    ) -> Result<AgentReply, PlatformError> {
        self.record(request);
        self.check_failure()?;
        Ok(self.reply.clone())
    }

    async fn stream_message(
        &self,
        request: AgentMessageRequest,
    ) -> Result<FragmentStream, PlatformError> {
        self.record(request);
        self.check_failure()?;
        let fragments = self.fragments.clone().into_iter().map(Ok);
        Ok(Box::pin(stream::iter(fragments)))
    }
}
