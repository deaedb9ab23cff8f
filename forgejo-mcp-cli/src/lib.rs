//! forgejo-mcp CLI library
//!
//! Command-line definitions and command implementations, exposed so they can
//! be tested without spawning the binary.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// `call` command
pub mod call;
/// Configuration loading and the `config` command
pub mod config;
/// CLI error type carrying an exit code
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Subscriber setup for stderr and MCP log files
pub mod logging;
/// `manual` command
pub mod manual;
/// Ctrl+C and SIGTERM handling for the server
pub mod signal_handler;
