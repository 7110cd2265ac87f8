// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! port-hostproc: the host auxiliary-service manager — runs
//! a developer's own long-lived process and routes it through the shared
//! reverse-proxy the same way a containerized stack would be.

pub mod error;
pub mod port_alloc;
pub mod prompt;
pub mod proxy;
pub mod repo;
pub mod service;
pub mod signals;

pub use error::{HostprocError, HostprocResult};
pub use port_alloc::allocate_ephemeral_port;
pub use prompt::{ReplacePrompt, StdinPrompt};
pub use proxy::{DockerComposeProxySupervisor, ProxySupervisor};
pub use repo::find_repo_root;
pub use service::{run, stop_host_service, StopOutcome};
pub use signals::HostServiceSignal;
