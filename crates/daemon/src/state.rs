// SPDX-License-Identifier: MIT

//! `runtime/daemon.json`: written atomically
//! on every loop tick so `ensureDaemon` and CLI status queries can read a
//! consistent snapshot without racing a partial write.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use port_core::{DaemonState, DaemonStatus};
use port_storage::lock::write_file_atomic;

use crate::error::DaemonResult;

pub struct DaemonStateFile {
    path: PathBuf,
}

impl DaemonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Option<DaemonState> {
        let bytes = std::fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn write(&self, state: &DaemonState) -> DaemonResult<()> {
        let mut bytes = serde_json::to_vec_pretty(state).map_err(std::io::Error::from)?;
        bytes.push(b'\n');
        write_file_atomic(&self.path, &bytes)?;
        Ok(())
    }
}

/// True if `path` holds a [`DaemonState`] whose pid still passes a
/// signal-0 liveness probe.
pub fn existing_daemon_is_alive(path: &Path, is_alive: impl Fn(u32) -> bool) -> Option<DaemonState> {
    let state = DaemonStateFile::new(path).read()?;
    is_alive(state.pid).then_some(state)
}

pub fn heartbeat(state: &mut DaemonState, now: DateTime<Utc>) {
    state.heartbeat_at = now;
}

pub fn mark_idle(state: &mut DaemonState, now: DateTime<Utc>) {
    if state.idle_since.is_none() {
        state.idle_since = Some(now);
    }
}

pub fn clear_idle(state: &mut DaemonState) {
    state.idle_since = None;
}

/// Whether the daemon has been idle for at least `idle_stop`.
pub fn idle_expired(state: &DaemonState, now: DateTime<Utc>, idle_stop: chrono::Duration) -> bool {
    match state.idle_since {
        Some(since) => now - since >= idle_stop,
        None => false,
    }
}

pub fn new_starting(now: DateTime<Utc>) -> DaemonState {
    DaemonState::starting(std::process::id(), now)
}

pub fn status_running(state: &mut DaemonState) {
    state.status = DaemonStatus::Running;
}

pub fn status_stopping(state: &mut DaemonState) {
    state.status = DaemonStatus::Stopping;
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
