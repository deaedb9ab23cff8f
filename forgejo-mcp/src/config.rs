//! Configuration management for forgejo-mcp
//!
//! Settings are layered: built-in defaults, then `FORGEJO_MCP_*` environment
//! variables, then an optional `forgejo-mcp.yaml` file. Command line flags are
//! applied last by the CLI through [`Config::with_overrides`].

use crate::common::env_loader::EnvLoader;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const MAX_TIMEOUT_SECONDS: u64 = 600;
const CONFIG_FILENAME: &str = "forgejo-mcp.yaml";

/// Prefix shared by every environment variable the server reads
pub const ENV_PREFIX: &str = "FORGEJO_MCP";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        /// Path to the configuration file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML content from a configuration file
    #[error("Invalid YAML syntax in {path}:\n{source}\n\nHint: Check for proper indentation and YAML formatting")]
    YamlParse {
        /// Path to the configuration file with invalid YAML content
        path: PathBuf,
        /// Underlying YAML parsing error
        #[source]
        source: serde_yaml::Error,
    },

    /// Invalid configuration value for a specific field
    #[error("Invalid configuration value for '{field}': {value}\n{hint}")]
    InvalidValue {
        /// Name of the configuration field
        field: String,
        /// The rejected value
        value: String,
        /// How to fix it
        hint: String,
    },
}

/// Connection settings for the Forgejo/Gitea instance
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Root URL of the instance, without the `/api/v1` suffix
    pub base_url: String,
    /// Personal access token sent as `Authorization: token <token>`
    pub token: Option<String>,
    /// Per-request timeout for API calls
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: format!("forgejo-mcp/{}", crate::VERSION),
        }
    }
}

impl Config {
    /// Create a configuration from defaults, environment and the first YAML
    /// file found by [`Config::find_yaml_config_file`].
    ///
    /// An unreadable or invalid YAML file is logged and skipped.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env_vars();

        match YamlConfig::load_or_default() {
            Ok(yaml_config) => yaml_config.apply_to_config(&mut config),
            Err(e) => {
                tracing::warn!(
                    "Failed to load YAML configuration, falling back to env vars and defaults: {}",
                    e
                );
            }
        }

        config
    }

    /// Like [`Config::new`] but reads an explicit YAML file, failing if it is
    /// missing or malformed
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_vars();
        YamlConfig::load_from_file(path)?.apply_to_config(&mut config);
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        let loader = EnvLoader::new(ENV_PREFIX);

        self.base_url = loader.load_string("BASE_URL", &self.base_url);
        if let Some(token) = loader.load_optional::<String>("TOKEN") {
            self.token = Some(token);
        }
        self.timeout_seconds = loader.load_parsed("TIMEOUT_SECONDS", self.timeout_seconds);
        self.user_agent = loader.load_string("USER_AGENT", &self.user_agent);
    }

    /// Apply command line overrides on top of the loaded values
    pub fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(token) = token {
            self.token = Some(token);
        }
        self
    }

    /// Find the configuration file. The search order is:
    /// 1. `./forgejo-mcp.yaml`
    /// 2. `~/.config/forgejo-mcp/forgejo-mcp.yaml`
    /// 3. `~/.forgejo-mcp/config.yaml`
    pub fn find_yaml_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(CONFIG_FILENAME)];

        if let Some(home_dir) = dirs::home_dir() {
            search_paths.push(
                home_dir
                    .join(".config")
                    .join("forgejo-mcp")
                    .join(CONFIG_FILENAME),
            );
            search_paths.push(home_dir.join(".forgejo-mcp").join("config.yaml"));
        }

        let found = search_paths.into_iter().find(|path| path.is_file());
        match &found {
            Some(path) => tracing::debug!("Found configuration file: {:?}", path),
            None => tracing::debug!("No {} configuration file found", CONFIG_FILENAME),
        }
        found
    }

    /// The REST API root, e.g. `https://codeberg.org/api/v1`
    pub fn api_base_url(&self) -> String {
        format!("{}/api/v1", self.base_url.trim_end_matches('/'))
    }

    /// Validate the current configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            value: self.base_url.clone(),
            hint: format!("base_url must be an absolute URL such as https://codeberg.org ({e})"),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                hint: "base_url must use http or https".to_string(),
            });
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::InvalidValue {
                field: "timeout_seconds".to_string(),
                value: self.timeout_seconds.to_string(),
                hint: format!("timeout_seconds must be between 1 and {MAX_TIMEOUT_SECONDS}"),
            });
        }

        if matches!(&self.token, Some(token) if token.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "token".to_string(),
                value: String::new(),
                hint: "token cannot be blank; omit it to use anonymous access".to_string(),
            });
        }

        Ok(())
    }

    /// Generate an example YAML configuration file content
    pub fn example_yaml_config() -> &'static str {
        r#"# forgejo-mcp.yaml

# Root URL of your Forgejo or Gitea instance
base_url: "https://codeberg.org"

# Personal access token (prefer FORGEJO_MCP_TOKEN in the environment)
# token: "..."

# Seconds to wait for each API call
timeout_seconds: 30
"#
    }
}

/// Configuration loaded from a `forgejo-mcp.yaml` file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    /// Root URL of the instance
    pub base_url: Option<String>,
    /// Access token
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// User-Agent header
    pub user_agent: Option<String>,
}

impl YamlConfig {
    /// Apply YAML values to an existing Config; YAML values take precedence
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(ref token) = self.token {
            config.token = Some(token.clone());
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.timeout_seconds = timeout_seconds;
        }
        if let Some(ref user_agent) = self.user_agent {
            config.user_agent = user_agent.clone();
        }
    }

    /// Load YAML configuration from a file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("Loading YAML configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        // serde_yaml rejects an empty document for a struct, so treat it as "nothing set"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Try to load YAML configuration, returning default if no file is found
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Config::find_yaml_config_file() {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const ENV_KEYS: [&str; 4] = [
        "FORGEJO_MCP_BASE_URL",
        "FORGEJO_MCP_TOKEN",
        "FORGEJO_MCP_TIMEOUT_SECONDS",
        "FORGEJO_MCP_USER_AGENT",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.token, None);
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.user_agent.starts_with("forgejo-mcp/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_base_url_strips_trailing_slash() {
        let config = Config::default().with_overrides(Some("https://codeberg.org/".into()), None);
        assert_eq!(config.api_base_url(), "https://codeberg.org/api/v1");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::default().with_overrides(None, Some("s3cr3t".into()));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_config_new_uses_defaults_without_env_or_file() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp_dir.path()).unwrap();

        let config = Config::new();

        std::env::set_current_dir(original_dir).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    #[serial]
    fn test_config_with_env_vars() {
        clear_env();
        std::env::set_var("FORGEJO_MCP_BASE_URL", "https://git.example.com");
        std::env::set_var("FORGEJO_MCP_TOKEN", "abc123");
        std::env::set_var("FORGEJO_MCP_TIMEOUT_SECONDS", "90");

        let mut config = Config::default();
        config.apply_env_vars();
        clear_env();

        assert_eq!(config.base_url, "https://git.example.com");
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.timeout_seconds, 90);
    }

    #[test]
    #[serial]
    fn test_yaml_overrides_env() {
        clear_env();
        std::env::set_var("FORGEJO_MCP_BASE_URL", "https://from-env.example.com");
        let file = yaml_file("base_url: https://from-yaml.example.com\ntimeout_seconds: 5\n");

        let config = Config::load_from(file.path()).unwrap();
        clear_env();

        assert_eq!(config.base_url, "https://from-yaml.example.com");
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = Config::default()
            .with_overrides(Some("https://cli.example.com".into()), Some("tok".into()));
        assert_eq!(config.base_url, "https://cli.example.com");
        assert_eq!(config.token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_yaml_config_load_from_file_empty_file() {
        let file = yaml_file("   \n");
        let yaml = YamlConfig::load_from_file(file.path()).unwrap();
        assert!(yaml.base_url.is_none());
        assert!(yaml.token.is_none());
    }

    #[test]
    fn test_yaml_config_load_from_file_invalid_yaml() {
        let file = yaml_file("base_url: [unclosed\n");
        let err = YamlConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::YamlParse { .. }));
        assert!(err.to_string().contains("Hint"));
    }

    #[test]
    fn test_yaml_config_rejects_unknown_fields() {
        let file = yaml_file("base_ulr: https://typo.example.com\n");
        let err = YamlConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::YamlParse { .. }));
    }

    #[test]
    fn test_yaml_config_load_from_file_not_found() {
        let err = YamlConfig::load_from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config::default().with_overrides(Some("not a url".into()), None);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));

        let config = Config::default().with_overrides(Some("ftp://example.com".into()), None);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_timeout() {
        let config = Config {
            timeout_seconds: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            timeout_seconds: 601,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_token() {
        let config = Config {
            token: Some("  ".into()),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_example_yaml_parses() {
        let yaml: YamlConfig = serde_yaml::from_str(Config::example_yaml_config()).unwrap();
        assert_eq!(yaml.base_url.as_deref(), Some("https://codeberg.org"));
        assert_eq!(yaml.timeout_seconds, Some(30));
    }
}
