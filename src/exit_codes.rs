//! Standard exit codes for the msxpack builder
//!
//! One pack failing does not stop the batch; the process exit code reports
//! the most severe failure seen across the whole run.

/// Successful execution, every pack built
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Descriptor error (bad manifest, unknown block kind or machine)
pub const EXIT_CONFIG_ERROR: i32 = 102;

/// Content error (declared ROM digest not found in the ROM directory)
pub const EXIT_CONTENT_ERROR: i32 = 103;

/// I/O error (file not found, permission denied, disk error)
pub const EXIT_IO_ERROR: i32 = 104;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;
