//! Discord adapter (serenity).
//!
//! Implements the `warden-core` ChatGateway port over the Discord HTTP API
//! and wires gateway events into the core event router.

pub mod commands;
pub mod gateway;
pub mod handler;
pub mod start;

pub use gateway::DiscordGateway;
pub use handler::Handler;
