// SPDX-License-Identifier: MIT

//! `resolveTaskRef`: turns a user-typed reference into a task.

use port_core::{prefix_matches, Task, TaskId};

#[derive(Debug, Clone)]
pub enum ResolveOutcome {
    Found(Task),
    Ambiguous(Vec<Task>),
    NotFound,
}

/// Resolves `reference` against `tasks` in priority order: numeric
/// displayId, then exact id, then unique id prefix (with or without the
/// conventional `task-` prefix).
pub fn resolve_task_ref(tasks: &[Task], reference: &str) -> ResolveOutcome {
    if let Ok(display_id) = reference.parse::<u64>() {
        if let Some(task) = tasks.iter().find(|t| t.display_id == display_id) {
            return ResolveOutcome::Found(task.clone());
        }
        return ResolveOutcome::NotFound;
    }

    if let Some(task) = tasks.iter().find(|t| t.id.as_str() == reference) {
        return ResolveOutcome::Found(task.clone());
    }

    let candidates_by_prefix = |prefix: &str| -> Vec<&Task> {
        tasks.iter().filter(|t| prefix_matches(t.id.as_str(), prefix)).collect()
    };

    let mut candidates = candidates_by_prefix(reference);
    if candidates.is_empty() && !reference.starts_with(TaskId::PREFIX) {
        candidates = candidates_by_prefix(&format!("{}{}", TaskId::PREFIX, reference));
    }

    match candidates.len() {
        0 => ResolveOutcome::NotFound,
        1 => ResolveOutcome::Found(candidates[0].clone()),
        _ => ResolveOutcome::Ambiguous(candidates.into_iter().cloned().collect()),
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
