// SPDX-License-Identifier: MIT

//! `ensureDaemon`: make sure exactly one
//! daemon process is running for a repo, spawning a detached one if not.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use port_storage::lock::{with_file_lock, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
use port_storage::RepoPaths;
use tracing::info;

use crate::error::DaemonResult;
use crate::state::existing_daemon_is_alive;

fn is_alive(pid: u32) -> bool {
    signal::kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Ensures a daemon is running for `repo_root`, spawning `binary task daemon
/// --serve --repo <repo_root>` as a detached child if none is alive.
/// Serialized by `daemon-start.lock` so concurrent CLI invocations never
/// race to spawn two daemons for the same repo.
pub fn ensure_daemon(repo_root: &Path, binary: &Path) -> DaemonResult<()> {
    let paths = RepoPaths::new(repo_root);
    std::fs::create_dir_all(paths.runtime_dir())?;

    with_file_lock(&paths.daemon_start_lock(), DEFAULT_TIMEOUT, DEFAULT_RETRY_DELAY, || {
        if existing_daemon_is_alive(&paths.daemon_state_file(), is_alive).is_some() {
            return Ok(());
        }

        let child = std::process::Command::new(binary)
            .arg("task")
            .arg("daemon")
            .arg("--serve")
            .arg("--repo")
            .arg(repo_root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        info!(pid = child.id(), repo = %repo_root.display(), "spawned detached task daemon");
        // Reparented off the CLI on purpose: we never wait on it.
        std::mem::forget(child);
        Ok(())
    })
    .map_err(Into::into)
}

pub fn current_binary() -> PathBuf {
    std::env::current_exe().unwrap_or_else(|_| PathBuf::from("port"))
}

#[cfg(test)]
#[path = "singleton_tests.rs"]
mod tests;
