// SPDX-License-Identifier: MIT

use super::*;
use chrono::Duration;
use port_core::test_support::TaskBuilder;

fn base_time() -> DateTime<Utc> {
    "2026-01-01T00:00:00Z".parse().unwrap()
}

#[test]
fn still_running_when_alive_and_not_timed_out() {
    let mut task = TaskBuilder::new(1).status(TaskStatus::Running).build();
    task.runtime.timeout_at = Some(base_time() + Duration::minutes(30));
    assert_eq!(decide(&task, true, base_time()), ReapDecision::StillRunning);
}

#[test]
fn timed_out_takes_priority_over_alive_worker() {
    let mut task = TaskBuilder::new(1).status(TaskStatus::Running).build();
    task.runtime.timeout_at = Some(base_time());
    assert_eq!(decide(&task, true, base_time()), ReapDecision::TimedOut);
}

#[test]
fn exited_completed_task_is_cleaned_up() {
    let mut task = TaskBuilder::new(1).status(TaskStatus::Completed).build();
    task.runtime.timeout_at = Some(base_time() + Duration::minutes(30));
    assert_eq!(decide(&task, false, base_time()), ReapDecision::CleanupCompleted);
}

#[test]
fn exited_failed_task_is_retained() {
    let mut task = TaskBuilder::new(1).status(TaskStatus::Failed).build();
    assert_eq!(decide(&task, false, base_time()), ReapDecision::RetainTerminal);
}

#[test]
fn exited_cancelled_task_is_retained() {
    let task = TaskBuilder::new(1).status(TaskStatus::Cancelled).build();
    assert_eq!(decide(&task, false, base_time()), ReapDecision::RetainTerminal);
}

#[test]
fn worker_exited_while_still_running_is_unexpected() {
    let mut task = TaskBuilder::new(1).status(TaskStatus::Running).build();
    task.runtime.timeout_at = Some(base_time() + Duration::minutes(30));
    assert_eq!(decide(&task, false, base_time()), ReapDecision::UnexpectedExit);
}
