// SPDX-License-Identifier: MIT

//! The 1Hz daemon loop driver: owns the `DaemonState` file,
//! the stopping signal handlers, and the tick cadence. `tick::run_tick` does
//! the actual scheduling work; this module just decides when to call it and
//! when to stop calling it.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use port_adapters::{LocalAdapter, WorkerAdapter};
use port_core::{Clock, SystemClock};
use port_routing::RepoConfig;
use port_storage::{RepoPaths, TaskIndexStore};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use crate::error::DaemonResult;
use crate::state::{self, DaemonStateFile};
use crate::tick::run_tick;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the daemon loop for `repo_root` until it goes idle past the
/// configured `idleStopMs`, or SIGTERM/SIGINT arrives.
pub async fn serve(repo_root: &Path) -> DaemonResult<()> {
    let paths = RepoPaths::new(repo_root);
    std::fs::create_dir_all(paths.runtime_dir())?;

    let config = RepoConfig::load(&paths.config_file())?;
    let task_timeout = chrono::Duration::milliseconds(config.task.timeout_ms as i64);
    let idle_stop = chrono::Duration::milliseconds(config.task.idle_stop_ms as i64);

    let index = TaskIndexStore::new(paths.clone());
    let adapter: Arc<dyn WorkerAdapter> = Arc::new(LocalAdapter::new());
    let clock = SystemClock;

    let state_file = DaemonStateFile::new(paths.daemon_state_file());
    let mut daemon_state = state::new_starting(clock.now());
    state_file.write(&daemon_state)?;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    state::status_running(&mut daemon_state);
    state_file.write(&daemon_state)?;
    info!(repo = %repo_root.display(), "task daemon running");

    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = sigterm.recv() => {
                info!("received SIGTERM, stopping after this tick");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, stopping after this tick");
                break;
            }
        }

        let now = clock.now();
        let outcome =
            run_tick(repo_root, &paths, &index, &adapter, task_timeout, &clock, &config.subscribers).await;

        if outcome.active_count == 0 {
            state::mark_idle(&mut daemon_state, now);
        } else {
            state::clear_idle(&mut daemon_state);
        }
        state::heartbeat(&mut daemon_state, now);
        state_file.write(&daemon_state)?;

        if state::idle_expired(&daemon_state, now, idle_stop) {
            info!("idle timeout reached, stopping");
            break;
        }
    }

    state::status_stopping(&mut daemon_state);
    state_file.write(&daemon_state)?;
    Ok(())
}

#[cfg(test)]
#[path = "serve_tests.rs"]
mod tests;
