//! Shared fixtures for the workspace integration specs.
//!
//! Each [`Project`] is a throwaway repo rooted in its own tempdir, with its
//! own `PORT_GLOBAL_DIR` so concurrent `cargo test` runs (and the real
//! `~/.port`) never interact with the fixture.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use tempfile::TempDir;

pub struct Project {
    repo_dir: TempDir,
    global_dir: TempDir,
}

impl Project {
    /// A repo with a `.git` marker (enough for `repo_root_arg`'s upward walk;
    /// no real git binary is invoked by the commands these specs exercise).
    pub fn new() -> Self {
        let repo_dir = TempDir::new().expect("tempdir");
        let global_dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(repo_dir.path().join(".git")).expect("fake .git");
        Self { repo_dir, global_dir }
    }

    pub fn root(&self) -> &Path {
        self.repo_dir.path()
    }

    pub fn global_dir(&self) -> &Path {
        self.global_dir.path()
    }

    pub fn file(&self, relative: &str, contents: &str) -> &Self {
        let path = self.repo_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir -p");
        }
        std::fs::write(&path, contents).expect("write fixture file");
        self
    }

    /// Writes `.port/config.jsonc` with the given domain and, optionally, a
    /// short idle-stop so daemon specs don't have to wait ten minutes.
    pub fn config(&self, domain: &str, idle_stop_ms: Option<u64>) -> &Self {
        let idle = idle_stop_ms.map(|ms| format!(r#","task":{{"idleStopMs":{ms}}}"#)).unwrap_or_default();
        self.file(".port/config.jsonc", &format!(r#"{{"domain":"{domain}"{idle}}}"#));
        self
    }

    pub fn registry_file(&self) -> PathBuf {
        self.global_dir.path().join("registry.json")
    }

    pub fn write_registry(&self, json: &str) -> &Self {
        std::fs::write(self.registry_file(), json).expect("write registry fixture");
        self
    }

    pub fn daemon_state_file(&self) -> PathBuf {
        self.repo_dir.path().join(".port/jobs/runtime/daemon.json")
    }

    /// A `port` invocation pre-wired to this fixture's repo and global dir.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("port").expect("built `port` binary");
        cmd.current_dir(self.repo_dir.path());
        cmd.env("PORT_GLOBAL_DIR", self.global_dir.path());
        cmd
    }
}

/// Polls `predicate` every 25ms until it returns `true` or `max_ms` elapses.
/// Returns whether the predicate was ever observed true.
pub fn wait_for(max_ms: u64, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
}

pub trait AssertExt {
    fn passes(self) -> Self;
    fn stdout_string(&self) -> String;
}

impl AssertExt for Assert {
    fn passes(self) -> Self {
        self.success()
    }

    fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.get_output().stdout).into_owned()
    }
}
