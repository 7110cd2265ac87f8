//! `resolveTaskRef` resolution order (spec.md §4.E): numeric display id,
//! exact canonical id, then a unique id prefix with or without the
//! conventional `task-` prefix.

use crate::prelude::*;

fn full_id(project: &Project, display_id: &str) -> String {
    let shown = project.cmd().args(["task", "show", display_id]).assert().passes().stdout_string();
    let value: serde_json::Value = serde_json::from_str(&shown).expect("json");
    value["id"].as_str().expect("id string").to_string()
}

#[test]
fn exact_canonical_id_resolves() {
    let project = Project::new();
    project.cmd().args(["task", "create", "one", "--mode", "read"]).assert().passes();
    let id = full_id(&project, "1");

    let shown = project.cmd().args(["task", "show", &id]).assert().passes().stdout_string();
    let value: serde_json::Value = serde_json::from_str(&shown).expect("json");
    assert_eq!(value["id"], id);
}

#[test]
fn unique_prefix_without_task_dash_resolves() {
    let project = Project::new();
    project.cmd().args(["task", "create", "one", "--mode", "read"]).assert().passes();
    let id = full_id(&project, "1");
    let bare_prefix = id.strip_prefix("task-").expect("canonical ids carry a task- prefix")[..4].to_string();

    let shown = project.cmd().args(["task", "show", &bare_prefix]).assert().passes().stdout_string();
    let value: serde_json::Value = serde_json::from_str(&shown).expect("json");
    assert_eq!(value["id"], id);
}

#[test]
fn numeric_display_id_takes_priority_over_id_prefix() {
    let project = Project::new();
    project.cmd().args(["task", "create", "one", "--mode", "read"]).assert().passes();
    project.cmd().args(["task", "create", "two", "--mode", "read"]).assert().passes();

    let shown = project.cmd().args(["task", "show", "2"]).assert().passes().stdout_string();
    let value: serde_json::Value = serde_json::from_str(&shown).expect("json");
    assert_eq!(value["displayId"], 2);
    assert_eq!(value["title"], "two");
}
