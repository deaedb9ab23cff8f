//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: Runtime failure, including a tool call that returned an error result
//! - 2: Usage or configuration errors

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Runtime failure
pub const EXIT_WARNING: i32 = 1;

/// Usage or configuration error
pub const EXIT_ERROR: i32 = 2;
