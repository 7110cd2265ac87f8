// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn builder_applies_overrides() {
    let task = TaskBuilder::new(7).branch("feature-a").status(TaskStatus::Running).build();
    assert_eq!(task.display_id, 7);
    assert_eq!(task.branch.as_deref(), Some("feature-a"));
    assert_eq!(task.queue.lock_key, "feature-a");
    assert_eq!(task.status, TaskStatus::Running);
}
