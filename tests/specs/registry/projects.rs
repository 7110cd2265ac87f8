//! `port registry projects` — a read-only view over the global registry
//! (spec.md §4.B). The registry is keyed by `(repo, branch)`; two distinct
//! repos are free to register the same branch name.

use crate::prelude::*;

#[test]
fn empty_registry_reports_no_projects() {
    let project = Project::new();
    let out = project.cmd().args(["registry", "projects"]).assert().passes().stdout_string();
    assert!(out.contains("no registered projects"));
}

#[test]
fn reads_back_seeded_registry_entries() {
    let project = Project::new();
    let repo = project.root().display().to_string().replace('\\', "\\\\");
    project.write_registry(&format!(
        r#"{{"projects":[{{"repo":"{repo}","branch":"feature-a","ports":[3000,3001]}}],"hostServices":[]}}"#
    ));

    let out = project.cmd().args(["registry", "projects"]).assert().passes().stdout_string();
    assert!(out.contains("feature-a"));
    assert!(out.contains("3000"));
    assert!(out.contains("3001"));
}

#[test]
fn corrupt_registry_file_is_treated_as_empty() {
    let project = Project::new();
    std::fs::write(project.registry_file(), b"{ not json").expect("write garbage");
    let out = project.cmd().args(["registry", "projects"]).assert().passes().stdout_string();
    assert!(out.contains("no registered projects"));
}
