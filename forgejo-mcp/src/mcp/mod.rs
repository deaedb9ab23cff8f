//! Model Context Protocol (MCP) server support
//!
//! The registry in [`registry`] describes every operation. [`dispatch`]
//! validates calls against it before a verb tool in [`tools`] runs, and
//! [`manual`] renders it for the `gitea_manual` tool.

pub mod args;
pub mod dispatch;
pub mod manual;
pub mod registry;
pub mod server;
pub mod tool_registry;
pub mod tools;

pub use dispatch::{dispatch, DispatchError, HandlerError, VerbHandler};
pub use registry::{registry, Registry, Verb};
pub use server::McpServer;
pub use tool_registry::{register_all_tools, McpTool, ToolContext, ToolRegistry};
