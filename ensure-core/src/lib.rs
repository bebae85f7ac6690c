//! Core collaborators for the ensure CLI.
//!
//! This crate provides the side-effecting building blocks used by mock
//! generation: filesystem writes, external process execution, cancellation,
//! and the exit-cleanup registrar that runs when the process is interrupted.

mod cancel;
mod cleanup;
mod exec;
mod fs;

// Cancellation
pub use cancel::CancelToken;
// Exit cleanup
pub use cleanup::{CleanupError, ExitCleanup};
// Process execution
pub use exec::{CommandRunner, ExecError, ExecParams, ProcessRunner};
// Filesystem operations
pub use fs::{DIR_PERMISSIONS, FILE_PERMISSIONS, FsWrite, OsFs};
