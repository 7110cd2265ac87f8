// SPDX-License-Identifier: MIT

use super::*;
use std::path::PathBuf;
use tempfile::tempdir;

fn store(dir: &std::path::Path) -> RegistryStore {
    RegistryStore::new(&GlobalPaths::with_root(dir))
}

#[test]
fn register_project_upserts_by_repo_and_branch() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());
    let repo = PathBuf::from("/repo");
    store.register_project(&repo, "main", vec![3000]).unwrap();
    store.register_project(&repo, "main", vec![3000, 3001]).unwrap();
    let all = store.get_all_projects();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].ports, vec![3000, 3001]);
}

#[test]
fn unregister_project_absent_is_not_an_error() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());
    store.unregister_project(&PathBuf::from("/repo"), "main").unwrap();
    assert_eq!(store.get_project_count(), 0);
}

#[test]
fn distinct_branches_both_survive_concurrent_style_writes() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());
    let repo = PathBuf::from("/repo");
    for n in 0..20 {
        store.register_project(&repo, &format!("branch-{n}"), vec![]).unwrap();
    }
    assert_eq!(store.get_project_count(), 20);
}

#[test]
fn corrupt_registry_file_is_treated_as_empty() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("registry.json"), b"{not json").unwrap();
    let store = store(dir.path());
    assert_eq!(store.get_project_count(), 0);
}

#[test]
fn sweep_stale_host_services_removes_dead_pids_only() {
    let dir = tempdir().unwrap();
    let store = store(dir.path());
    let repo = PathBuf::from("/repo");
    store
        .register_host_service(HostServiceEntry {
            repo: repo.clone(),
            branch: "main".into(),
            logical_port: 9000,
            actual_port: 54321,
            pid: 111,
            config_file: PathBuf::from("/repo/.port/x.yml"),
        })
        .unwrap();
    store
        .register_host_service(HostServiceEntry {
            repo: repo.clone(),
            branch: "main".into(),
            logical_port: 9001,
            actual_port: 54322,
            pid: 222,
            config_file: PathBuf::from("/repo/.port/y.yml"),
        })
        .unwrap();

    let removed = store.sweep_stale_host_services(|pid| pid == 222).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].pid, 111);
    assert_eq!(store.get_all_host_services().len(), 1);
}
