//! Logging setup
//!
//! stdout carries the MCP protocol, so logs go to stderr, or to a file under
//! `~/.forgejo-mcp/` when serving a client over a pipe.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::Level;

/// Environment variable naming the MCP log file inside `~/.forgejo-mcp/`
pub const LOG_FILE_ENV: &str = "FORGEJO_MCP_LOG_FILE";

const DEFAULT_LOG_FILE: &str = "mcp.log";

/// A writer that flushes and syncs every write, so the MCP log is complete
/// even when the client kills the server.
pub struct FileWriterGuard {
    file: Arc<Mutex<fs::File>>,
}

impl FileWriterGuard {
    /// Wraps a shared file handle
    pub fn new(file: Arc<Mutex<fs::File>>) -> Self {
        Self { file }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, fs::File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.lock()?;
        let written = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self.lock()?;
        file.flush()?;
        file.sync_all()
    }
}

/// Pick the level from the global flags. `quiet` wins over everything else.
pub fn log_level(quiet: bool, debug: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Where the MCP log file lives
pub fn mcp_log_path() -> PathBuf {
    let log_dir = match dirs::home_dir() {
        Some(home) => home.join(".forgejo-mcp"),
        None => PathBuf::from(".forgejo-mcp"),
    };
    let file_name = std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    log_dir.join(file_name)
}

/// Install the global subscriber
pub fn init_logging(level: Level, mcp_mode: bool) {
    if mcp_mode {
        let log_file = mcp_log_path();
        if let Some(dir) = log_file.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                eprintln!("Failed to create log directory {}: {}", dir.display(), e);
            }
        }

        match fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
        {
            Ok(file) => {
                let shared = Arc::new(Mutex::new(file));
                tracing_subscriber::fmt()
                    .with_writer(move || FileWriterGuard::new(shared.clone()))
                    .with_max_level(level)
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => {
                eprintln!(
                    "Failed to open log file {}, using stderr: {}",
                    log_file.display(),
                    e
                );
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Read;

    #[test]
    fn test_log_level_precedence() {
        assert_eq!(log_level(false, false, false), Level::INFO);
        assert_eq!(log_level(false, true, false), Level::DEBUG);
        assert_eq!(log_level(false, true, true), Level::TRACE);
        assert_eq!(log_level(true, true, true), Level::ERROR);
    }

    #[test]
    #[serial]
    fn test_mcp_log_path_respects_env() {
        std::env::set_var(LOG_FILE_ENV, "session.log");
        let path = mcp_log_path();
        std::env::remove_var(LOG_FILE_ENV);

        assert!(path.ends_with(".forgejo-mcp/session.log"));
        assert!(mcp_log_path().ends_with(".forgejo-mcp/mcp.log"));
    }

    #[test]
    fn test_file_writer_guard_writes_through() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let file = temp.reopen().unwrap();
        let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));

        guard.write_all(b"server started\n").unwrap();

        let mut contents = String::new();
        temp.reopen().unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "server started\n");
    }
}
