//! Branch-lock queue scenario 1 from spec.md §8: two write-mode tasks
//! sharing a branch serialize through `blockedByTaskId`, and cancelling the
//! head of the queue unblocks the next one.

use crate::prelude::*;

fn display_id_of(value: &serde_json::Value) -> i64 {
    value["displayId"].as_i64().expect("displayId")
}

#[test]
fn second_write_task_on_same_branch_is_blocked_until_first_finishes() {
    let project = Project::new();

    project
        .cmd()
        .args(["task", "create", "t1", "--mode", "write", "--branch", "feature-a"])
        .assert()
        .passes();
    project
        .cmd()
        .args(["task", "create", "t2", "--mode", "write", "--branch", "feature-a"])
        .assert()
        .passes();

    let t1 = project.cmd().args(["task", "show", "1"]).assert().passes().stdout_string();
    let t1: serde_json::Value = serde_json::from_str(&t1).expect("json");
    assert_eq!(display_id_of(&t1), 1);
    assert!(t1["queue"]["blockedByTaskId"].is_null(), "first task in a branch group is never blocked");

    let t2 = project.cmd().args(["task", "show", "2"]).assert().passes().stdout_string();
    let t2: serde_json::Value = serde_json::from_str(&t2).expect("json");
    assert_eq!(t2["queue"]["blockedByTaskId"], t1["id"], "second task is blocked by the first");

    // Cancel the head of the queue; it moves to a terminal status.
    project.cmd().args(["task", "cancel", "1"]).assert().passes();

    let t2_after = project.cmd().args(["task", "show", "2"]).assert().passes().stdout_string();
    let t2_after: serde_json::Value = serde_json::from_str(&t2_after).expect("json");
    assert!(
        t2_after["queue"]["blockedByTaskId"].is_null(),
        "cancelling the head of the queue unblocks the next task"
    );
}

#[test]
fn write_tasks_on_different_branches_never_block_each_other() {
    let project = Project::new();

    project
        .cmd()
        .args(["task", "create", "a", "--mode", "write", "--branch", "feature-a"])
        .assert()
        .passes();
    project
        .cmd()
        .args(["task", "create", "b", "--mode", "write", "--branch", "feature-b"])
        .assert()
        .passes();

    let b = project.cmd().args(["task", "show", "2"]).assert().passes().stdout_string();
    let b: serde_json::Value = serde_json::from_str(&b).expect("json");
    assert!(b["queue"]["blockedByTaskId"].is_null());
}

#[test]
fn read_mode_tasks_never_participate_in_the_queue() {
    let project = Project::new();
    project
        .cmd()
        .args(["task", "create", "a", "--mode", "write", "--branch", "feature-a"])
        .assert()
        .passes();
    project.cmd().args(["task", "create", "read it", "--mode", "read"]).assert().passes();

    let read_task = project.cmd().args(["task", "show", "2"]).assert().passes().stdout_string();
    let read_task: serde_json::Value = serde_json::from_str(&read_task).expect("json");
    assert!(read_task["queue"]["blockedByTaskId"].is_null());
}
