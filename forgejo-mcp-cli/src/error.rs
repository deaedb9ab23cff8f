//! Error handling for the forgejo-mcp CLI
//!
//! Errors carry the exit code the process should end with, so commands can
//! fail with `?` and `main` only has to translate the result once.

use std::error::Error;
use std::fmt;

use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type that includes both error information and suggested exit code
#[derive(Debug)]
pub struct CliError {
    /// Message printed to stderr
    pub message: String,
    /// Process exit code
    pub exit_code: i32,
    /// Underlying cause, if any
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    /// Create a new CLI error with a message and exit code
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Create a CLI error from another error with a specific exit code
    pub fn from_error<E: Error + Send + Sync + 'static>(error: E, exit_code: i32) -> Self {
        Self {
            message: error.to_string(),
            exit_code,
            source: Some(Box::new(error)),
        }
    }

    /// Runtime failure, exit code 1
    pub fn general<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::from_error(error, EXIT_WARNING)
    }

    /// Usage or configuration problem, exit code 2
    pub fn usage<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::from_error(error, EXIT_ERROR)
    }

    /// Get the full error chain as a formatted string
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        let mut current_source = self.source.as_deref().and_then(|e| e.source());
        while let Some(err) = current_source {
            result.push_str(&format!("\n  Caused by: {}", err));
            current_source = err.source();
        }

        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<forgejo_mcp::ConfigError> for CliError {
    fn from(error: forgejo_mcp::ConfigError) -> Self {
        Self::usage(error)
    }
}

impl From<forgejo_mcp::ForgeMcpError> for CliError {
    fn from(error: forgejo_mcp::ForgeMcpError) -> Self {
        match error {
            forgejo_mcp::ForgeMcpError::Config(_) => Self::usage(error),
            other => Self::general(other),
        }
    }
}

/// Convert a CliResult to an exit code, printing the full error chain if needed
pub fn handle_cli_result<T>(result: CliResult<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.full_chain());
            e.exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_full_chain_follows_sources() {
        let inner = io::Error::new(io::ErrorKind::NotFound, "forgejo-mcp.yaml");
        let config_error = forgejo_mcp::ConfigError::FileRead {
            path: "forgejo-mcp.yaml".into(),
            source: inner,
        };
        let error = CliError::from(config_error);

        assert_eq!(error.exit_code, EXIT_ERROR);
        assert!(error.full_chain().contains("Caused by: forgejo-mcp.yaml"));
    }

    #[test]
    fn test_handle_cli_result_codes() {
        assert_eq!(handle_cli_result::<()>(Ok(())), EXIT_SUCCESS);
        assert_eq!(
            handle_cli_result::<()>(Err(CliError::new("tool failed", EXIT_WARNING))),
            EXIT_WARNING
        );
    }

    #[test]
    fn test_runtime_errors_are_general() {
        let error = CliError::from(forgejo_mcp::ForgeMcpError::api(500, "boom"));
        assert_eq!(error.exit_code, EXIT_WARNING);
        assert_eq!(error.message, "API error (500): boom");
    }
}
