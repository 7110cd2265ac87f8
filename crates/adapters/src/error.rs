// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("prepare failed: {0}")]
    PrepareFailed(String),
    #[error("start failed: {0}")]
    StartFailed(String),
    #[error("cleanup failed: {0}")]
    CleanupFailed(String),
    #[error("no checkpoint available for restore")]
    NoCheckpoint,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type AdapterResult<T> = Result<T, AdapterError>;
