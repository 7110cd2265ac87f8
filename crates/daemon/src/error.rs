// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Storage(#[from] port_storage::StorageError),
    #[error(transparent)]
    Adapter(#[from] port_adapters::AdapterError),
    #[error(transparent)]
    Routing(#[from] port_routing::RoutingError),
    #[error(transparent)]
    Engine(#[from] port_engine::EngineError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("task {0} not found")]
    TaskNotFound(String),
}

pub type DaemonResult<T> = Result<T, DaemonError>;
