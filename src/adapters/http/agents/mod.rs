//! Agent relay endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AgentsAppState;
pub use routes::agent_routes;
