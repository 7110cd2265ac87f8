// SPDX-License-Identifier: MIT

//! The shared error taxonomy.
//!
//! Storage, adapters, routing, and the daemon loop each have their own
//! error enum for the failure modes specific to them, but every one of
//! those enums carries a [`CoreError`] variant for the handful of failure
//! kinds that recur everywhere: a missing precondition, a lock timeout, a
//! corrupted state file. Keeping those here means a `match` on "is this
//! retryable" reads the same from any crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing CLI argument. Surfaced to the user; exits non-zero.
    #[error("invalid input: {0}")]
    UserInput(String),

    /// Not in a repository, repository not initialized, or a lock file's
    /// parent directory is missing.
    #[error("precondition not met: {0}")]
    PreconditionMissing(String),

    /// A file lock could not be acquired within its budget.
    #[error("timed out waiting for lock at {path}")]
    LockTimeout { path: std::path::PathBuf },

    /// A worker-adapter operation (prepare/start/cancel/cleanup/checkpoint/restore) failed.
    #[error("adapter failure: {0}")]
    AdapterFailure(String),

    /// A subprocess (git, the worker binary, a host service command) exited non-zero.
    #[error("external tool {tool} failed: {detail}")]
    ExternalToolError { tool: String, detail: String },

    /// A JSON state file failed to parse. Treated as empty by readers
    /// (best-effort recovery); never silently overwritten without a prior lock.
    #[error("corrupt state file at {path}: {detail}")]
    Corruption { path: std::path::PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
