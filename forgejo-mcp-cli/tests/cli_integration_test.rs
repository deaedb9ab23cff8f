//! Integration tests for the forgejo-mcp binary

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn forgejo_mcp() -> Result<Command> {
    let mut cmd = Command::cargo_bin("forgejo-mcp")?;
    cmd.env_remove("FORGEJO_MCP_BASE_URL")
        .env_remove("FORGEJO_MCP_TOKEN")
        .env_remove("FORGEJO_MCP_TIMEOUT_SECONDS");
    Ok(cmd)
}

#[test]
fn test_help_lists_commands() -> Result<()> {
    forgejo_mcp()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("manual"))
        .stdout(predicate::str::contains("call"));
    Ok(())
}

#[test]
fn test_manual_overview() -> Result<()> {
    forgejo_mcp()?
        .arg("manual")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("unlink"));
    Ok(())
}

#[test]
fn test_manual_resources_for_action() -> Result<()> {
    forgejo_mcp()?
        .args(["manual", "delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| `wiki_page` | Delete a wiki page. |"));
    Ok(())
}

#[test]
fn test_manual_link_type_page() -> Result<()> {
    forgejo_mcp()?
        .args(["manual", "link", "issue_dependency"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## link issue_dependency"));
    Ok(())
}

#[test]
fn test_manual_unknown_action_exits_with_usage_error() -> Result<()> {
    forgejo_mcp()?
        .args(["manual", "merge"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown action 'merge'"));
    Ok(())
}

#[test]
fn test_config_example() -> Result<()> {
    forgejo_mcp()?
        .args(["config", "--format", "example"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# forgejo-mcp.yaml"));
    Ok(())
}

#[test]
fn test_config_from_explicit_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "base_url: \"https://git.example.com/\"")?;

    forgejo_mcp()?
        .args(["config", "--config"])
        .arg(file.path())
        .args(["--token", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api: https://git.example.com/api/v1"))
        .stdout(predicate::str::contains("token: <set>"))
        .stdout(predicate::str::contains("secret").not());
    Ok(())
}

#[test]
fn test_invalid_base_url_exits_with_usage_error() -> Result<()> {
    forgejo_mcp()?
        .args(["--base-url", "ftp://git.example.com", "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("base_url must use http or https"));
    Ok(())
}

#[test]
fn test_call_manual_tool_offline() -> Result<()> {
    forgejo_mcp()?
        .args(["call", "gitea_manual", "--args", r#"{"action":"create","resource":"label"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("## create label"));
    Ok(())
}

#[test]
fn test_call_unknown_tool() -> Result<()> {
    forgejo_mcp()?
        .args(["call", "merge_gitea"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown tool: merge_gitea"));
    Ok(())
}

#[test]
fn test_call_validation_error_is_reported_without_network() -> Result<()> {
    forgejo_mcp()?
        .args(["call", "get_gitea", "--args", r#"{"resource":"issue","owner":"org"}"#])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error: repo is required"))
        .stdout(predicate::str::contains("## get issue"))
        .stderr(predicate::str::contains("get_gitea returned an error result"));
    Ok(())
}

#[test]
fn test_call_rejects_non_object_arguments() -> Result<()> {
    forgejo_mcp()?
        .args(["call", "list_gitea", "--args", "[]"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--args must be a JSON object"));
    Ok(())
}
