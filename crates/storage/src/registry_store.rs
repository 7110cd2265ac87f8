// SPDX-License-Identifier: MIT

//! GlobalRegistry persistence.
//!
//! The registry is created lazily on first write and never deleted as a
//! whole; a corrupt file is treated as empty on read rather than retried or
//! repaired in place.

use std::fs;
use std::path::{Path, PathBuf};

use port_core::{GlobalRegistry, HostServiceEntry, ProjectEntry};
use tracing::warn;

use crate::error::StorageResult;
use crate::lock::{with_file_lock, write_file_atomic, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
use crate::paths::GlobalPaths;

pub struct RegistryStore {
    registry_file: PathBuf,
    lock_file: PathBuf,
}

impl RegistryStore {
    pub fn new(paths: &GlobalPaths) -> Self {
        Self { registry_file: paths.registry_file(), lock_file: paths.registry_lock() }
    }

    fn read(&self) -> GlobalRegistry {
        match fs::read(&self.registry_file) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(registry) => registry,
                Err(e) => {
                    warn!(path = %self.registry_file.display(), error = %e, "corrupt registry file, treating as empty");
                    GlobalRegistry::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => GlobalRegistry::default(),
            Err(_) => GlobalRegistry::default(),
        }
    }

    fn mutate(&self, f: impl FnOnce(&mut GlobalRegistry)) -> StorageResult<()> {
        with_file_lock(&self.lock_file, DEFAULT_TIMEOUT, DEFAULT_RETRY_DELAY, || {
            let mut registry = self.read();
            f(&mut registry);
            let mut bytes = serde_json::to_vec_pretty(&registry).map_err(std::io::Error::from)?;
            bytes.push(b'\n');
            write_file_atomic(&self.registry_file, &bytes)
        })
    }

    pub fn register_project(&self, repo: &Path, branch: &str, ports: Vec<u16>) -> StorageResult<()> {
        self.mutate(|registry| {
            registry.projects.retain(|p| p.key() != (repo, branch));
            registry.projects.push(ProjectEntry { repo: repo.to_path_buf(), branch: branch.to_string(), ports });
        })
    }

    pub fn unregister_project(&self, repo: &Path, branch: &str) -> StorageResult<()> {
        self.mutate(|registry| {
            registry.projects.retain(|p| p.key() != (repo, branch));
        })
    }

    pub fn register_host_service(&self, svc: HostServiceEntry) -> StorageResult<()> {
        self.mutate(|registry| {
            registry.host_services.retain(|s| s.key() != svc.key());
            registry.host_services.push(svc);
        })
    }

    pub fn unregister_host_service(&self, repo: &Path, branch: &str, logical_port: u16) -> StorageResult<()> {
        self.mutate(|registry| {
            registry.host_services.retain(|s| s.key() != (repo, branch, logical_port));
        })
    }

    /// Removes every host-service entry whose pid is no longer alive. The
    /// liveness probe lives in `port-hostproc` since it needs `nix`, which
    /// this crate does not depend on.
    pub fn sweep_stale_host_services(&self, is_alive: impl Fn(u32) -> bool) -> StorageResult<Vec<HostServiceEntry>> {
        let mut removed = Vec::new();
        self.mutate(|registry| {
            let (keep, drop) = std::mem::take(&mut registry.host_services)
                .into_iter()
                .partition(|s| is_alive(s.pid));
            registry.host_services = keep;
            removed = drop;
        })?;
        Ok(removed)
    }

    pub fn get_all_projects(&self) -> Vec<ProjectEntry> {
        self.read().projects
    }

    pub fn has_registered_projects(&self) -> bool {
        !self.read().projects.is_empty()
    }

    pub fn get_project_count(&self) -> usize {
        self.read().projects.len()
    }

    pub fn get_host_service(&self, repo: &Path, branch: &str, logical_port: u16) -> Option<HostServiceEntry> {
        self.read().host_services.into_iter().find(|s| s.key() == (repo, branch, logical_port))
    }

    pub fn get_host_services_for_worktree(&self, repo: &Path, branch: &str) -> Vec<HostServiceEntry> {
        self.read().host_services.into_iter().filter(|s| s.repo == repo && s.branch == branch).collect()
    }

    pub fn get_all_host_services(&self) -> Vec<HostServiceEntry> {
        self.read().host_services
    }
}

#[cfg(test)]
#[path = "registry_store_tests.rs"]
mod tests;
