//! `port task create/list/show` over a fresh repo (spec.md §4.E).

use crate::prelude::*;

#[test]
fn create_then_list_then_show_round_trip() {
    let project = Project::new();

    let created = project
        .cmd()
        .args(["task", "create", "look around", "--mode", "read"])
        .assert()
        .passes()
        .stdout_string();
    assert!(created.contains("created task task-"));
    assert!(created.contains("(#1)"));

    let listed = project.cmd().args(["task", "list"]).assert().passes().stdout_string();
    assert!(listed.contains("#1"));
    assert!(listed.contains("queued"));
    assert!(listed.contains("look around"));

    let shown = project.cmd().args(["task", "show", "1"]).assert().passes().stdout_string();
    let value: serde_json::Value = serde_json::from_str(&shown).expect("show prints JSON");
    assert_eq!(value["displayId"], 1);
    assert_eq!(value["title"], "look around");
    assert_eq!(value["mode"], "read");
    assert_eq!(value["status"], "queued");
    // Read-mode tasks never participate in the branch-lock queue.
    assert!(value["queue"]["blockedByTaskId"].is_null());
}

#[test]
fn write_mode_task_requires_branch() {
    let project = Project::new();
    let assert = project.cmd().args(["task", "create", "edit things", "--mode", "write"]).assert();
    assert.failure();
}

#[test]
fn second_task_gets_next_display_id() {
    let project = Project::new();
    project.cmd().args(["task", "create", "first", "--mode", "read"]).assert().passes();
    let second = project
        .cmd()
        .args(["task", "create", "second", "--mode", "read"])
        .assert()
        .passes()
        .stdout_string();
    assert!(second.contains("(#2)"));
}

#[test]
fn show_unknown_reference_is_an_error() {
    let project = Project::new();
    project.cmd().args(["task", "create", "only one", "--mode", "read"]).assert().passes();
    project.cmd().args(["task", "show", "99"]).assert().failure();
}
