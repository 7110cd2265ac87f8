// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn global_paths_honor_env_override() {
    let paths = GlobalPaths::with_root("/tmp/fake-global");
    assert_eq!(paths.registry_file(), Path::new("/tmp/fake-global/registry.json"));
    assert_eq!(paths.traefik_dynamic_dir(), Path::new("/tmp/fake-global/traefik/dynamic"));
}

#[test]
fn repo_paths_lay_out_jobs_subtree() {
    let paths = RepoPaths::new("/repo");
    assert_eq!(paths.index_file(), Path::new("/repo/.port/jobs/index.json"));
    assert_eq!(paths.all_events_log(), Path::new("/repo/.port/jobs/events/all.jsonl"));
    assert_eq!(paths.task_events_log("task-abc"), Path::new("/repo/.port/jobs/events/task-abc.jsonl"));
    assert_eq!(paths.daemon_state_file(), Path::new("/repo/.port/jobs/runtime/daemon.json"));
    assert_eq!(paths.artifacts_dir("task-abc"), Path::new("/repo/.port/jobs/artifacts/task-abc"));
    assert_eq!(paths.cursor_file("opencode"), Path::new("/repo/.port/jobs/subscribers/opencode.cursor.json"));
}
