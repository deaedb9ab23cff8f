//! `forgejo-mcp manual`: the documentation tool, offline

use forgejo_mcp::mcp::manual::render_manual;
use forgejo_mcp::mcp::registry;

use crate::error::{CliError, CliResult};

/// Render the manual page for an optional action and resource
pub fn manual_text(action: Option<&str>, resource: Option<&str>) -> CliResult<String> {
    render_manual(registry(), action, resource).map_err(CliError::usage)
}

/// Runs `forgejo-mcp manual`
pub fn run_manual_command(action: Option<String>, resource: Option<String>) -> CliResult<()> {
    let text = manual_text(action.as_deref(), resource.as_deref())?;
    println!("{text}");
    Ok(())
}
