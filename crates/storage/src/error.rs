// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use port_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("timed out waiting for lock at {path}")]
    LockTimeout { path: PathBuf },

    #[error("corrupt state file at {path}: {detail}")]
    Corruption { path: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type StorageResult<T> = Result<T, StorageError>;
