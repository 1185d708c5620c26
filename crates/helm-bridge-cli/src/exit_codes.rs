//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure, or an `ERROR:` result in raw mode
pub const ERROR: i32 = 1;

/// Helm error - helm ran and reported a failure
pub const HELM_ERROR: i32 = 2;

/// Not found - the release does not exist
pub const NOT_FOUND: i32 = 3;

/// Timeout - helm did not finish in time
pub const TIMEOUT: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
