//! StreamResponseHandler - streamed relay with sentence regrouping.
//!
//! Composes the platform's fragment stream with the domain chunker: raw
//! deltas go in, boundary-aligned chunks come out, with the caller-supplied
//! thread id seeding the resolved value until the upstream assigns one.

use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

use crate::domain::streaming::{chunk_fragments, AnswerChunk};
use crate::ports::{AgentMessageRequest, AgentPlatform, PlatformError};

/// Lazy sequence of boundary-aligned chunks for one streamed reply.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<AnswerChunk, PlatformError>> + Send>>;

/// Command to send a message and stream the regrouped answer.
#[derive(Debug, Clone)]
pub struct StreamResponseCommand {
    /// The user's message text.
    pub message: String,
    /// Target agent identifier.
    pub agent_id: String,
    /// Optional thread id to continue conversation context.
    pub thread_id: Option<String>,
}

/// Handler for the streaming request mode.
pub struct StreamResponseHandler {
    platform: Arc<dyn AgentPlatform>,
}

impl StreamResponseHandler {
    pub fn new(platform: Arc<dyn AgentPlatform>) -> Self {
        Self { platform }
    }

    /// Starts the upstream run and returns the regrouped chunk stream.
    ///
    /// An upstream failure on the initiating call is returned here, before
    /// any chunk is produced.
    pub async fn handle(&self, cmd: StreamResponseCommand) -> Result<ChunkStream, PlatformError> {
        let seed_thread = cmd.thread_id.clone().unwrap_or_default();
        let request =
            AgentMessageRequest::new(cmd.message, cmd.agent_id).with_thread_id(cmd.thread_id);

        let fragments = self.platform.stream_message(request).await?;
        Ok(Box::pin(chunk_fragments(fragments, seed_thread)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_platform::{MockAgentPlatform, MockFailure};
    use crate::domain::streaming::AnswerFragment;
    use futures::StreamExt;

    fn command(thread_id: Option<&str>) -> StreamResponseCommand {
        StreamResponseCommand {
            message: "question".to_string(),
            agent_id: "agent-1".to_string(),
            thread_id: thread_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn regroups_fragments_on_boundaries() {
        let platform = MockAgentPlatform::new().with_fragments(vec![
            AnswerFragment::new("A", ""),
            AnswerFragment::new("B.", "t1"),
        ]);
        let handler = StreamResponseHandler::new(Arc::new(platform));

        let chunks: Vec<_> = handler
            .handle(command(None))
            .await
            .unwrap()
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].answer, "AB.");
        assert_eq!(chunks[0].thread_id, "t1");
    }

    #[tokio::test]
    async fn caller_thread_id_seeds_chunks() {
        let platform = MockAgentPlatform::new()
            .with_fragments(vec![AnswerFragment::new("no boundary", "")]);
        let handler = StreamResponseHandler::new(Arc::new(platform));

        let chunks: Vec<_> = handler
            .handle(command(Some("t-caller")))
            .await
            .unwrap()
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].thread_id, "t-caller");
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_before_streaming() {
        let platform = MockAgentPlatform::failing(MockFailure::Upstream {
            status: 401,
            body: "missing api key".to_string(),
        });
        let handler = StreamResponseHandler::new(Arc::new(platform));

        let err = match handler.handle(command(None)).await {
            Ok(_) => panic!("expected upstream failure"),
            Err(e) => e,
        };
        assert_eq!(err.detail(), "missing api key");
    }
}
