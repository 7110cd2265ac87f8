// SPDX-License-Identifier: MIT

//! Task lifecycle events. Events are an open set of dotted
//! strings; the handful of well-known ones get constructors so every
//! emission site spells them the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{TaskId, TaskStatus};

/// A dotted event-type string, e.g. `task.created`, `task.worker.started`.
/// Kept as an owned string rather than an enum: the set is open, and a
/// closed enum would reject custom `task.worker.*` types a future adapter
/// introduces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(pub String);

impl EventType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn created() -> Self {
        Self::new("task.created")
    }

    pub fn transition(status: TaskStatus) -> Self {
        Self::new(format!("task.{}", status.event_suffix()))
    }

    pub fn worker(suffix: &str) -> Self {
        Self::new(format!("task.worker.{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEvent {
    pub id: String,
    pub task_id: TaskId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TaskEvent {
    pub fn new(task_id: TaskId, event_type: EventType, at: DateTime<Utc>) -> Self {
        Self { id: nanoid::nanoid!(12), task_id, event_type, at, message: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
