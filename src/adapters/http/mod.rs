//! HTTP adapters - REST surface exposed to callers.

pub mod agents;

pub use agents::{agent_routes, AgentsAppState};
