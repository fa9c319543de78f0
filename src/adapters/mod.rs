//! Adapters - implementations of port interfaces.
//!
//! - `orchestrate` - reqwest client for the watsonx Orchestrate API
//! - `http` - axum REST surface exposed to callers
//! - `mock_platform` - configurable in-process platform for tests

pub mod http;
pub mod mock_platform;
pub mod orchestrate;

pub use mock_platform::{MockAgentPlatform, MockFailure};
pub use orchestrate::{OrchestrateClient, OrchestrateClientConfig};
