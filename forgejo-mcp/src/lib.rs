//! # forgejo-mcp
//!
//! A self-documenting Model Context Protocol server for Forgejo and Gitea.
//!
//! ## Features
//!
//! - **Verb tools**: seven tools (`create_gitea`, `get_gitea`, `list_gitea`,
//!   `edit_gitea`, `delete_gitea`, `link_gitea`, `unlink_gitea`) that select
//!   the target with a `resource` or `type` discriminator
//! - **Manual**: `gitea_manual` documents every operation from one registry
//! - **Enriched errors**: rejected calls carry the operation's documentation
//! - **Pluggable transport**: an HTTP client for real servers and an in-memory
//!   mock for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forgejo_mcp::mcp::registry::registry;
//! use forgejo_mcp::mcp::manual::render_manual;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text = render_manual(registry(), Some("create"), Some("issue"))?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Shared helpers
pub mod common;

/// Layered configuration
pub mod config;

/// Library error type
pub mod error;

/// Typed Forgejo API client and transports
pub mod client;

/// API payload models
pub mod models;

/// Markdown rendering of payloads
pub mod render;

/// Model Context Protocol (MCP) server support
pub mod mcp;

pub use client::{ForgejoClient, HttpTransport, MockTransport, Transport};
pub use config::{Config, ConfigError};
pub use error::{ForgeMcpError, Result};
pub use mcp::McpServer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::mcp::registry::{registry, ManualEntry, ParamKind, ParamSpec, Registry, Verb};
    pub use crate::mcp::McpServer;
    pub use crate::{Config, ForgeMcpError, ForgejoClient, Result};
}
