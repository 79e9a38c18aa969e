//! Core domain + application logic for the warden admin bot.
//!
//! This crate is intentionally framework-agnostic. Discord and the backend
//! HTTP API live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod embed;
pub mod errors;
pub mod logging;
pub mod ports;
pub mod registry;
pub mod router;

pub use errors::{Error, Result};
