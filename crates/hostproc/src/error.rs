// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostprocError {
    #[error("no repo found above {0}")]
    RepoNotFound(PathBuf),
    #[error(transparent)]
    Routing(#[from] port_routing::RoutingError),
    #[error(transparent)]
    Storage(#[from] port_storage::StorageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type HostprocResult<T> = Result<T, HostprocError>;
