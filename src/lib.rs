//! Orchestrate Gateway - HTTP façade over watsonx Orchestrate agents.
//!
//! Relays chat requests to the upstream platform and regroups the streamed
//! reply into sentence-aligned server-sent events for downstream clients.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
