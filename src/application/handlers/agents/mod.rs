//! Agent relay handlers - listing, blocking replies, and streamed replies.

mod get_response;
mod list_agents;
mod stream_response;

pub use get_response::{GetResponseCommand, GetResponseHandler};
pub use list_agents::ListAgentsHandler;
pub use stream_response::{ChunkStream, StreamResponseCommand, StreamResponseHandler};
