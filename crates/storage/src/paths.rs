// SPDX-License-Identifier: MIT

//! Well-known filesystem layout.

use std::path::{Path, PathBuf};

/// `<user-home>/.port/` — shared across every repo on the host.
///
/// Honors `PORT_GLOBAL_DIR` so tests never touch a real home directory.
#[derive(Debug, Clone)]
pub struct GlobalPaths {
    root: PathBuf,
}

impl GlobalPaths {
    pub fn discover() -> Self {
        let root = match std::env::var_os("PORT_GLOBAL_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".port"),
        };
        Self { root }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry_file(&self) -> PathBuf {
        self.root.join("registry.json")
    }

    pub fn registry_lock(&self) -> PathBuf {
        self.root.join("registry.lock")
    }

    pub fn traefik_lock(&self) -> PathBuf {
        self.root.join("traefik.lock")
    }

    pub fn traefik_dir(&self) -> PathBuf {
        self.root.join("traefik")
    }

    pub fn traefik_static_config(&self) -> PathBuf {
        self.traefik_dir().join("traefik.yml")
    }

    pub fn traefik_compose_file(&self) -> PathBuf {
        self.traefik_dir().join("docker-compose.yml")
    }

    pub fn traefik_dynamic_dir(&self) -> PathBuf {
        self.traefik_dir().join("dynamic")
    }
}

/// `<repo>/.port/` — per-repository state.
#[derive(Debug, Clone)]
pub struct RepoPaths {
    repo_root: PathBuf,
}

impl RepoPaths {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self { repo_root: repo_root.into() }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn dot_port(&self) -> PathBuf {
        self.repo_root.join(".port")
    }

    pub fn config_file(&self) -> PathBuf {
        self.dot_port().join("config.jsonc")
    }

    pub fn trees_dir(&self) -> PathBuf {
        self.dot_port().join("trees")
    }

    pub fn worktree_dir(&self, branch_sanitized: &str) -> PathBuf {
        self.trees_dir().join(branch_sanitized)
    }

    pub fn override_file(&self) -> PathBuf {
        self.dot_port().join("override.yml")
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.dot_port().join("jobs")
    }

    pub fn index_file(&self) -> PathBuf {
        self.jobs_dir().join("index.json")
    }

    pub fn index_lock(&self) -> PathBuf {
        self.jobs_dir().join("index.lock")
    }

    pub fn events_dir(&self) -> PathBuf {
        self.jobs_dir().join("events")
    }

    pub fn all_events_log(&self) -> PathBuf {
        self.events_dir().join("all.jsonl")
    }

    pub fn task_events_log(&self, task_id: &str) -> PathBuf {
        self.events_dir().join(format!("{task_id}.jsonl"))
    }

    pub fn runtime_dir(&self) -> PathBuf {
        self.jobs_dir().join("runtime")
    }

    pub fn daemon_state_file(&self) -> PathBuf {
        self.runtime_dir().join("daemon.json")
    }

    pub fn daemon_start_lock(&self) -> PathBuf {
        self.runtime_dir().join("daemon-start.lock")
    }

    pub fn artifacts_dir(&self, task_id: &str) -> PathBuf {
        self.jobs_dir().join("artifacts").join(task_id)
    }

    pub fn subscribers_dir(&self) -> PathBuf {
        self.jobs_dir().join("subscribers")
    }

    pub fn cursor_file(&self, consumer: &str) -> PathBuf {
        self.subscribers_dir().join(format!("{consumer}.cursor.json"))
    }

    pub fn cursor_lock(&self, consumer: &str) -> PathBuf {
        self.subscribers_dir().join(format!("{consumer}.cursor.lock"))
    }

    pub fn notifications_log(&self, consumer: &str) -> PathBuf {
        self.subscribers_dir().join(format!("{consumer}.notifications.log"))
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
