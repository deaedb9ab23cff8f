//! Configuration loading and the `config` command

use forgejo_mcp::Config;
use std::path::Path;

use crate::cli::ConfigFormat;
use crate::error::CliResult;

/// Load settings, apply the command line overrides and validate the result
///
/// An explicit `path` must exist and parse; otherwise the usual search
/// through the environment and well-known files applies.
pub fn load_config(
    path: Option<&Path>,
    base_url: Option<String>,
    token: Option<String>,
) -> CliResult<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::new(),
    }
    .with_overrides(base_url, token);

    config.validate()?;
    Ok(config)
}

/// Text printed by `forgejo-mcp config`
pub fn describe_config(config: &Config, format: ConfigFormat) -> String {
    match format {
        ConfigFormat::Example => Config::example_yaml_config().to_string(),
        ConfigFormat::Effective => {
            let source = Config::find_yaml_config_file()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(none)".to_string());
            format!(
                "base_url: {}\napi: {}\ntoken: {}\ntimeout_seconds: {}\nuser_agent: {}\nconfig_file: {}\n",
                config.base_url,
                config.api_base_url(),
                if config.token.is_some() { "<set>" } else { "<not set>" },
                config.timeout_seconds,
                config.user_agent,
                source,
            )
        }
    }
}

/// Runs `forgejo-mcp config`
pub fn run_config_command(config: &Config, format: ConfigFormat) -> CliResult<()> {
    print!("{}", describe_config(config, format));
    Ok(())
}
