// SPDX-License-Identifier: MIT

//! Per-repo config, `<repo>/.port/config.jsonc`: domain, compose
//! file path, extra TCP-only ports, and task scheduling defaults. Parsed
//! with `json5` since the file is JSONC (comments and trailing commas
//! allowed).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RoutingError, RoutingResult};

fn default_task_timeout_ms() -> u64 {
    30 * 60 * 1000
}

fn default_idle_stop_ms() -> u64 {
    10 * 60 * 1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    #[serde(default = "default_task_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_idle_stop_ms")]
    pub idle_stop_ms: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self { timeout_ms: default_task_timeout_ms(), idle_stop_ms: default_idle_stop_ms() }
    }
}

/// The subscriber dispatcher's per-repo configuration: which
/// consumers get the global event stream. Disabled and empty by default, so
/// a repo that never mentions `subscribers` in its config gets no dispatch
/// overhead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribersConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub consumers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoConfig {
    pub domain: String,
    #[serde(default = "default_compose_path")]
    pub compose_path: PathBuf,
    #[serde(default)]
    pub tcp_ports: Vec<u16>,
    #[serde(default)]
    pub task: TaskConfig,
    #[serde(default)]
    pub subscribers: SubscribersConfig,
}

fn default_compose_path() -> PathBuf {
    PathBuf::from("docker-compose.yml")
}

impl RepoConfig {
    pub fn load(path: &Path) -> RoutingResult<Self> {
        let text = std::fs::read_to_string(path)?;
        json5::from_str(&text).map_err(|e| RoutingError::InvalidConfig(e.to_string()))
    }

    pub fn to_jsonc(&self) -> RoutingResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RoutingError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
