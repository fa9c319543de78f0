//! Ports - interfaces between the gateway core and the outside world.

mod agent_platform;

pub use agent_platform::{
    AgentMessageRequest, AgentPlatform, AgentReply, AgentSummary, FragmentStream, PlatformError,
};
