// SPDX-License-Identifier: MIT

//! Finding which repo a bare `port task ...` invocation without `--repo`
//! applies to. Unlike `port-hostproc::repo::find_repo_root`, this walks up
//! looking for `.git` rather than `.port`, since the very first `task
//! create` in a repo runs before `.port/` exists.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

pub fn repo_root_arg(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(repo) = explicit {
        return Ok(repo);
    }
    let cwd = std::env::current_dir()?;
    discover(&cwd).ok_or_else(|| anyhow!("not inside a git repository (pass --repo explicitly)"))
}

fn discover(start: &Path) -> Option<PathBuf> {
    let mut candidate = start;
    loop {
        if candidate.join(".git").exists() {
            return Some(candidate.to_path_buf());
        }
        candidate = candidate.parent()?;
    }
}
