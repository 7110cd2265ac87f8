// SPDX-License-Identifier: MIT

//! GlobalRegistry and DaemonState record types.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub repo: PathBuf,
    pub branch: String,
    pub ports: Vec<u16>,
}

impl ProjectEntry {
    /// Uniqueness key for `GlobalRegistry.projects`.
    pub fn key(&self) -> (&std::path::Path, &str) {
        (&self.repo, &self.branch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostServiceEntry {
    pub repo: PathBuf,
    pub branch: String,
    pub logical_port: u16,
    pub actual_port: u16,
    pub pid: u32,
    pub config_file: PathBuf,
}

impl HostServiceEntry {
    /// Uniqueness key for `GlobalRegistry.hostServices`.
    pub fn key(&self) -> (&std::path::Path, &str, u16) {
        (&self.repo, &self.branch, self.logical_port)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalRegistry {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub host_services: Vec<HostServiceEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaemonStatus {
    Starting,
    Running,
    Stopping,
}

/// Runtime-only, one per repo. Never part of the TaskIndex;
/// lives at `runtime/daemon.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonState {
    pub pid: u32,
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub heartbeat_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_since: Option<DateTime<Utc>>,
    pub status: DaemonStatus,
}

impl DaemonState {
    pub fn starting(pid: u32, now: DateTime<Utc>) -> Self {
        Self {
            pid,
            id: nanoid::nanoid!(12),
            started_at: now,
            heartbeat_at: now,
            idle_since: None,
            status: DaemonStatus::Starting,
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
