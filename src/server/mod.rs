//! Daemon side: configuration, the JSON-RPC tool protocol and transports.
//!
//! This module provides:
//! - Configuration and secrets loading (`config`)
//! - The tool protocol dispatcher (`protocol`)
//! - HTTP and SSE transports over axum (`http`)
//! - Newline-delimited stdio transport (`stdio`)

pub mod config;
pub mod http;
pub mod protocol;
pub mod stdio;

pub use config::{Config, Secrets, Transport};
pub use protocol::ToolServer;
