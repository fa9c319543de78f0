//! Orchestrate adapter - talks to the watsonx Orchestrate HTTP API.

mod client;
mod events;

pub use client::{OrchestrateClient, OrchestrateClientConfig};
