// SPDX-License-Identifier: MIT

use super::*;
use crate::task::{TaskMode, TaskStatus};
use chrono::Duration;

fn make(branch: &str, mode: TaskMode, status: TaskStatus, offset_secs: i64) -> Task {
    let base: chrono::DateTime<chrono::Utc> = "2026-01-01T00:00:00Z".parse().unwrap();
    let mut task = Task::new(1, "t", mode, Some(branch.into()), "local", base + Duration::seconds(offset_secs));
    task.status = status;
    task
}

#[test]
fn second_write_task_on_same_branch_is_blocked_by_first() {
    let mut tasks = vec![
        make("feature-a", TaskMode::Write, TaskStatus::Queued, 0),
        make("feature-a", TaskMode::Write, TaskStatus::Queued, 60),
    ];
    reconcile(&mut tasks);
    assert!(tasks[0].queue.blocked_by_task_id.is_none());
    assert_eq!(tasks[1].queue.blocked_by_task_id, Some(tasks[0].id));
}

#[test]
fn completing_the_blocker_unblocks_the_next_on_reconcile() {
    let mut tasks = vec![
        make("feature-a", TaskMode::Write, TaskStatus::Completed, 0),
        make("feature-a", TaskMode::Write, TaskStatus::Queued, 60),
    ];
    reconcile(&mut tasks);
    assert!(tasks[0].queue.blocked_by_task_id.is_none());
    assert!(tasks[1].queue.blocked_by_task_id.is_none());
}

#[test]
fn read_mode_tasks_never_block_or_are_blocked() {
    let mut tasks = vec![
        make("feature-a", TaskMode::Read, TaskStatus::Running, 0),
        make("feature-a", TaskMode::Write, TaskStatus::Queued, 60),
    ];
    reconcile(&mut tasks);
    assert!(tasks[0].queue.blocked_by_task_id.is_none());
    assert!(tasks[1].queue.blocked_by_task_id.is_none());
}

#[test]
fn branchless_write_tasks_never_block_or_are_blocked() {
    let mut tasks = vec![Task::new(
        1,
        "t",
        TaskMode::Write,
        None,
        "local",
        "2026-01-01T00:00:00Z".parse().unwrap(),
    )];
    reconcile(&mut tasks);
    assert!(tasks[0].queue.blocked_by_task_id.is_none());
}

#[test]
fn distinct_branches_never_block_each_other() {
    let mut tasks = vec![
        make("feature-a", TaskMode::Write, TaskStatus::Queued, 0),
        make("feature-b", TaskMode::Write, TaskStatus::Queued, 30),
    ];
    reconcile(&mut tasks);
    assert!(tasks[0].queue.blocked_by_task_id.is_none());
    assert!(tasks[1].queue.blocked_by_task_id.is_none());
}

#[test]
fn three_deep_chain_blocks_each_on_its_immediate_predecessor() {
    let mut tasks = vec![
        make("feature-a", TaskMode::Write, TaskStatus::Queued, 0),
        make("feature-a", TaskMode::Write, TaskStatus::Queued, 60),
        make("feature-a", TaskMode::Write, TaskStatus::Queued, 120),
    ];
    reconcile(&mut tasks);
    assert!(tasks[0].queue.blocked_by_task_id.is_none());
    assert_eq!(tasks[1].queue.blocked_by_task_id, Some(tasks[0].id));
    assert_eq!(tasks[2].queue.blocked_by_task_id, Some(tasks[1].id));
}
