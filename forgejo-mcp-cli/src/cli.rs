use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::io;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum ConfigFormat {
    /// Effective settings, token redacted
    Effective,
    /// Commented sample forgejo-mcp.yaml
    Example,
}

#[derive(Parser, Debug)]
#[command(name = "forgejo-mcp")]
#[command(version)]
#[command(about = "An MCP server for Forgejo and Gitea repositories")]
#[command(long_about = "
forgejo-mcp is an MCP (Model Context Protocol) server that lets an agent work
with issues, labels, milestones, releases, wiki pages, pull requests and
repositories on a Forgejo or Gitea instance. Every tool is documented by the
gitea_manual tool, which is also available offline through `manual`.

Example usage:
  forgejo-mcp serve                       # Run as MCP server over stdio
  forgejo-mcp manual create               # Resources create_gitea accepts
  forgejo-mcp manual link issue_label     # Parameters of one operation
  forgejo-mcp call list_gitea --args '{\"resource\":\"label\",\"owner\":\"o\",\"repo\":\"r\"}'
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Read settings from this YAML file instead of searching for one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root URL of the Forgejo/Gitea instance
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Personal access token
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server (default when invoked via stdio)
    #[command(long_about = "
Runs forgejo-mcp as an MCP server speaking JSON-RPC on stdin/stdout.
The server exposes eight tools: gitea_manual plus one tool per action
(create_gitea, get_gitea, list_gitea, edit_gitea, delete_gitea, link_gitea,
unlink_gitea).

Logs never go to stdout. When stdin is not a terminal they are written to
~/.forgejo-mcp/mcp.log (override the file name with FORGEJO_MCP_LOG_FILE).

Example:
  forgejo-mcp serve
  forgejo-mcp --base-url https://codeberg.org serve
")]
    Serve,
    /// Print tool documentation without contacting a server
    #[command(long_about = "
Prints the same documentation the gitea_manual tool returns.

  forgejo-mcp manual                      # Overview of all actions
  forgejo-mcp manual edit                 # Resources edit_gitea accepts
  forgejo-mcp manual edit milestone       # Parameters of one operation
  forgejo-mcp manual unlink issue_blocking

For link and unlink the second argument is the relationship type.
")]
    Manual {
        /// Action to describe (create, get, list, edit, delete, link, unlink)
        action: Option<String>,

        /// Resource, or relationship type for link/unlink
        resource: Option<String>,
    },
    /// Run one tool call and print its result
    #[command(long_about = "
Invokes a tool once against the configured instance and prints the text it
returns. Arguments are a JSON object, exactly as an MCP client would send them.

Exit codes:
  0 - The tool succeeded
  1 - The tool returned an error result
  2 - Unknown tool, malformed arguments or invalid configuration

Example:
  forgejo-mcp call get_gitea --args '{\"resource\":\"issue\",\"owner\":\"o\",\"repo\":\"r\",\"index\":1}'
")]
    Call {
        /// Tool name, e.g. list_gitea
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Show configuration
    Config {
        /// What to print
        #[arg(long, value_enum, default_value = "effective")]
        format: ConfigFormat,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    #[allow(dead_code)]
    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    #[allow(dead_code)]
    pub fn is_tty() -> bool {
        io::stdout().is_terminal()
    }

    #[allow(dead_code)]
    pub fn should_use_color() -> bool {
        Self::is_tty() && std::env::var("NO_COLOR").is_err()
    }
}
