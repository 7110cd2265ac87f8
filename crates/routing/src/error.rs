// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("invalid repo config: {0}")]
    InvalidConfig(String),
    #[error("invalid compose document: {0}")]
    InvalidCompose(String),
    #[error("invalid static routing config: {0}")]
    InvalidStaticConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Storage(#[from] port_storage::StorageError),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
