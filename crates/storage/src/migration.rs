// SPDX-License-Identifier: MIT

//! In-memory normalization of legacy (v1/v2) `TaskIndex` documents up to the
//! current v3 shape.
//!
//! Operates on the raw [`serde_json::Value`] before typed deserialization,
//! since older documents are missing fields the current [`Task`](port_core::Task)
//! struct requires. The migration never writes to disk itself; the next
//! mutating write persists the normalized form via the ordinary write path.

use serde_json::{Map, Value};

pub const CURRENT_VERSION: u64 = 3;

/// Normalizes `doc` in place. A no-op if `doc` is already at
/// [`CURRENT_VERSION`] and has every field the current format expects.
pub fn normalize(doc: &mut Value) {
    let on_disk_version = doc.get("version").and_then(Value::as_u64).unwrap_or(1);

    let Some(tasks) = doc.get_mut("tasks").and_then(Value::as_array_mut) else {
        doc["version"] = Value::from(CURRENT_VERSION);
        doc["nextDisplayId"] = doc.get("nextDisplayId").cloned().unwrap_or_else(|| Value::from(1));
        return;
    };

    if on_disk_version < CURRENT_VERSION {
        assign_missing_display_ids(tasks);
    }

    for task in tasks.iter_mut() {
        fill_task_defaults(task);
    }

    let max_display_id = tasks.iter().filter_map(|t| t.get("displayId").and_then(Value::as_u64)).max().unwrap_or(0);
    let next_display_id = doc.get("nextDisplayId").and_then(Value::as_u64).unwrap_or(0).max(max_display_id + 1);

    doc["version"] = Value::from(CURRENT_VERSION);
    doc["nextDisplayId"] = Value::from(next_display_id);
}

/// Assigns `displayId` to every task missing one, ordered by
/// `(createdAt, id)` ascending, continuing from the current max.
fn assign_missing_display_ids(tasks: &mut [Value]) {
    let mut next = tasks.iter().filter_map(|t| t.get("displayId").and_then(Value::as_u64)).max().unwrap_or(0) + 1;

    let mut indices: Vec<usize> =
        (0..tasks.len()).filter(|&i| tasks[i].get("displayId").and_then(Value::as_u64).is_none()).collect();
    indices.sort_by(|&a, &b| {
        let created_a = tasks[a].get("createdAt").and_then(Value::as_str).unwrap_or("");
        let created_b = tasks[b].get("createdAt").and_then(Value::as_str).unwrap_or("");
        let id_a = tasks[a].get("id").and_then(Value::as_str).unwrap_or("");
        let id_b = tasks[b].get("id").and_then(Value::as_str).unwrap_or("");
        created_a.cmp(created_b).then_with(|| id_a.cmp(id_b))
    });

    for idx in indices {
        if let Some(obj) = tasks[idx].as_object_mut() {
            obj.insert("displayId".to_string(), Value::from(next));
            next += 1;
        }
    }
}

fn fill_task_defaults(task: &mut Value) {
    let Some(obj) = task.as_object_mut() else { return };
    obj.entry("adapter").or_insert_with(|| Value::String("local".to_string()));
    obj.entry("capabilities").or_insert_with(default_capabilities);
    obj.entry("queue").or_insert_with(default_queue);
    obj.entry("runtime").or_insert_with(|| Value::Object(Map::new()));
}

fn default_capabilities() -> Value {
    let mut caps = Map::new();
    for key in ["attachHandoff", "resumeToken", "transcript", "failedSnapshot", "checkpointRestore"] {
        caps.insert(key.to_string(), Value::Bool(false));
    }
    Value::Object(caps)
}

fn default_queue() -> Value {
    let mut queue = Map::new();
    queue.insert("lockKey".to_string(), Value::String(String::new()));
    Value::Object(queue)
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
