//! Environment variable loading with a shared prefix
//!
//! Every setting the server reads from the environment is named
//! `<PREFIX>_<SUFFIX>`, e.g. `FORGEJO_MCP_BASE_URL`.

use std::env;
use std::str::FromStr;

/// Loads prefixed environment variables with typed fallbacks
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Full variable name for a suffix
    pub fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Raw value, treating empty or whitespace-only values as unset
    fn raw(&self, suffix: &str) -> Option<String> {
        env::var(self.key(suffix))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Load a string value with default
    pub fn load_string(&self, suffix: &str, default: &str) -> String {
        self.raw(suffix).unwrap_or_else(|| default.to_string())
    }

    /// Load a parsed value, keeping the default when unset or unparsable
    pub fn load_parsed<T>(&self, suffix: &str, default: T) -> T
    where
        T: FromStr,
    {
        match self.raw(suffix) {
            Some(value) => match value.parse() {
                Ok(parsed) => parsed,
                Err(_) => {
                    tracing::warn!(
                        "Ignoring unparsable value '{}' for {}",
                        value,
                        self.key(suffix)
                    );
                    default
                }
            },
            None => default,
        }
    }

    /// Load an optional value
    pub fn load_optional<T>(&self, suffix: &str) -> Option<T>
    where
        T: FromStr,
    {
        self.raw(suffix).and_then(|v| v.parse().ok())
    }

    /// Load a boolean flag; accepts `1/0`, `true/false`, `yes/no`, `on/off`
    pub fn load_flag(&self, suffix: &str, default: bool) -> bool {
        match self.raw(suffix).map(|v| v.to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
            _ => default,
        }
    }
}
