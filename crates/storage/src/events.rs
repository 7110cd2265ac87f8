// SPDX-License-Identifier: MIT

//! Append-only JSONL event logs. Events are never mutated
//! or deleted once written.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use port_core::TaskEvent;

use crate::error::StorageResult;

/// Appends `event` to `path`, one JSON object per line, no trailing comma.
/// Callers append the same event to both the per-task log and the global
/// log; this function does not know about that duplication.
pub fn append(path: &Path, event: &TaskEvent) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(event).map_err(std::io::Error::from)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Reads every event in `path`. Lines that fail to parse are skipped rather
/// than aborting the read.
pub fn read_all(path: &Path) -> StorageResult<Vec<TaskEvent>> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut events = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(event) = serde_json::from_str(&line) {
            events.push(event);
        }
    }
    Ok(events)
}

/// Reads the half-open line range `[start, start + limit)` from `path`,
/// used by the subscriber dispatcher.
pub fn read_range(path: &Path, start: usize, limit: usize) -> StorageResult<Vec<TaskEvent>> {
    let all = read_all(path)?;
    Ok(all.into_iter().skip(start).take(limit).collect())
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
