//! `forgejo-mcp call`: one tool invocation outside an MCP session

use colored::Colorize;
use forgejo_mcp::mcp::tool_registry::result_text;
use forgejo_mcp::{Config, McpServer};
use serde_json::{Map, Value};

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use crate::exit_codes::{EXIT_ERROR, EXIT_WARNING};

/// Parse `--args` into the argument object a tool expects
pub fn parse_tool_arguments(raw: &str) -> CliResult<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw).map_err(CliError::usage)?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CliError::new(
            format!("--args must be a JSON object, got {other}"),
            EXIT_ERROR,
        )),
    }
}

/// Call `tool` on `server` and return its text
///
/// A tool that reports an error result fails with exit code 1 and the
/// tool's own message.
pub async fn call_tool(server: &McpServer, tool: &str, raw_args: &str) -> CliResult<String> {
    let arguments = parse_tool_arguments(raw_args)?;
    let result = server
        .call_tool_by_name(tool, arguments)
        .await
        .map_err(|e| CliError::new(e.message.to_string(), EXIT_ERROR))?;

    let text = result_text(&result);
    if result.is_error == Some(true) {
        tracing::debug!("{} returned an error result", tool);
        return Err(CliError::new(text, EXIT_WARNING));
    }
    Ok(text)
}

/// Runs `forgejo-mcp call`
///
/// The tool's text goes to stdout either way, since an error result is still
/// the tool's answer.
pub async fn run_call_command(config: &Config, tool: &str, raw_args: &str) -> CliResult<()> {
    let server = McpServer::new(config)?;
    match call_tool(&server, tool, raw_args).await {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) if e.exit_code == EXIT_WARNING => {
            if Cli::should_use_color() {
                println!("{}", e.message.red());
            } else {
                println!("{}", e.message);
            }
            Err(CliError::new(
                format!("{tool} returned an error result"),
                EXIT_WARNING,
            ))
        }
        Err(e) => Err(e),
    }
}
