//! End-to-end scenario 6 from spec.md §8: a daemon with a tiny
//! `idleStopMs` in an otherwise empty repo reaches `status=stopping` and
//! exits cleanly within a couple of ticks, leaving no stray lock file.

use crate::prelude::*;

#[test]
fn daemon_exits_after_idle_timeout_with_no_tasks() {
    let project = Project::new();
    project.config("idle-shutdown.test", Some(10));

    project
        .cmd()
        .args(["task", "daemon", "--serve", "--repo"])
        .arg(project.root())
        .assert()
        .passes();

    let bytes = std::fs::read(project.daemon_state_file()).expect("daemon.json written");
    let state: serde_json::Value = serde_json::from_slice(&bytes).expect("daemon.json is JSON");
    assert_eq!(state["status"], "stopping");

    let lock_path = project.root().join(".port/jobs/runtime/daemon-start.lock");
    assert!(!lock_path.exists(), "the daemon never holds daemon-start.lock itself");
}

#[test]
fn daemon_requires_a_repo_config_file() {
    let project = Project::new();
    // No `.port/config.jsonc` written: `domain` has no default, so `serve`
    // must fail fast rather than silently assume one.
    project
        .cmd()
        .args(["task", "daemon", "--serve", "--repo"])
        .arg(project.root())
        .assert()
        .failure();
}
