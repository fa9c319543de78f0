//! Domain logic - pure, I/O-free building blocks of the gateway.

pub mod streaming;
