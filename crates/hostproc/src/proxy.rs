// SPDX-License-Identifier: MIT

//! Ensuring the shared reverse-proxy container is running: a singleton
//! container, started through the reconciler's compose file, with
//! concurrent "start" attempts coalescing on "already in use" by polling
//! liveness instead of racing to create it twice.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::sleep;

use crate::error::{HostprocError, HostprocResult};

const COALESCE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const COALESCE_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait ProxySupervisor: Send + Sync {
    async fn ensure_running(&self, compose_file: &Path, container_name: &str) -> HostprocResult<()>;
}

/// Shells out to `docker compose up -d` against the reconciler's compose
/// file, the same way a developer would bring the proxy up by hand.
pub struct DockerComposeProxySupervisor;

#[async_trait]
impl ProxySupervisor for DockerComposeProxySupervisor {
    async fn ensure_running(&self, compose_file: &Path, container_name: &str) -> HostprocResult<()> {
        let output = Command::new("docker")
            .args(["compose", "-f"])
            .arg(compose_file)
            .args(["up", "-d"])
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.contains("already in use") {
            return Err(HostprocError::Io(std::io::Error::other(format!(
                "docker compose up failed: {stderr}"
            ))));
        }

        wait_until_live(container_name).await
    }
}

async fn wait_until_live(container_name: &str) -> HostprocResult<()> {
    let deadline = tokio::time::Instant::now() + COALESCE_TIMEOUT;
    loop {
        if is_container_running(container_name).await {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(HostprocError::Io(std::io::Error::other(format!(
                "proxy container {container_name} did not become live within {COALESCE_TIMEOUT:?}"
            ))));
        }
        sleep(COALESCE_POLL_INTERVAL).await;
    }
}

async fn is_container_running(container_name: &str) -> bool {
    let Ok(output) = Command::new("docker")
        .args(["inspect", "-f", "{{.State.Running}}", container_name])
        .output()
        .await
    else {
        return false;
    };
    output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true"
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
