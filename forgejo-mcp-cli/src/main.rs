use std::process;

use clap::CommandFactory;
use forgejo_mcp::{Config, McpServer};
use forgejo_mcp_cli::cli::{Cli, Commands};
use forgejo_mcp_cli::config::{load_config, run_config_command};
use forgejo_mcp_cli::error::{handle_cli_result, CliError, CliResult};
use forgejo_mcp_cli::exit_codes::EXIT_SUCCESS;
use forgejo_mcp_cli::{call, logging, manual, signal_handler};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Fast path for help - avoid expensive initialization
    if cli.command.is_none() {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {e}");
        }
        process::exit(EXIT_SUCCESS);
    }

    use is_terminal::IsTerminal;
    let is_mcp_mode =
        matches!(cli.command, Some(Commands::Serve)) && !std::io::stdin().is_terminal();

    // More verbose for MCP mode, where the log file is the only window into a session
    let level = if is_mcp_mode && !cli.quiet {
        tracing::Level::DEBUG
    } else {
        logging::log_level(cli.quiet, cli.debug, cli.verbose)
    };
    logging::init_logging(level, is_mcp_mode);

    process::exit(handle_cli_result(run(cli).await));
}

async fn run(cli: Cli) -> CliResult<()> {
    let Some(command) = cli.command else {
        return Ok(());
    };

    let load = || load_config(cli.config.as_deref(), cli.base_url.clone(), cli.token.clone());

    match command {
        Commands::Manual { action, resource } => {
            tracing::debug!("Rendering manual");
            manual::run_manual_command(action, resource)
        }
        Commands::Serve => {
            let config = load()?;
            tracing::info!("Starting MCP server for {}", config.base_url);
            run_server(&config).await
        }
        Commands::Call { tool, args } => {
            tracing::info!("Calling {}", tool);
            call::run_call_command(&load()?, &tool, &args).await
        }
        Commands::Config { format } => run_config_command(&load()?, format),
    }
}

async fn run_server(config: &Config) -> CliResult<()> {
    use rmcp::serve_server;
    use rmcp::transport::io::stdio;
    use tokio_util::sync::CancellationToken;

    let server = McpServer::new(config)?;

    let ct = CancellationToken::new();
    signal_handler::spawn_shutdown_listener(ct.clone());

    let running = serve_server(server, stdio()).await.map_err(|e| {
        tracing::error!("MCP server error: {}", e);
        CliError::general(e)
    })?;
    tracing::info!("MCP server started successfully");

    tokio::select! {
        quit_reason = running.waiting() => {
            let quit_reason = quit_reason.map_err(CliError::general)?;
            tracing::info!("MCP server shut down: {:?}", quit_reason);
        }
        _ = ct.cancelled() => {
            tracing::info!("MCP server stopped by signal");
        }
    }
    Ok(())
}
