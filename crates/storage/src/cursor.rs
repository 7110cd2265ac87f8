// SPDX-License-Identifier: MIT

//! Per-consumer cursor into `events/all.jsonl`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::lock::{with_file_lock, write_file_atomic, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConsumerCursor {
    #[serde(default)]
    pub line: usize,
}

fn read(path: &Path) -> ConsumerCursor {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
        Err(_) => ConsumerCursor::default(),
    }
}

pub fn get(cursor_file: &Path) -> ConsumerCursor {
    read(cursor_file)
}

/// Advances the cursor under `lock_file`, running `f(old_line) -> new_line`
/// to compute the next position. Only called after a consumer batch is
/// fully, successfully delivered.
pub fn advance(
    cursor_file: &Path,
    lock_file: &Path,
    f: impl FnOnce(usize) -> usize,
) -> StorageResult<ConsumerCursor> {
    with_file_lock(lock_file, DEFAULT_TIMEOUT, DEFAULT_RETRY_DELAY, || {
        let current = read(cursor_file);
        let next = ConsumerCursor { line: f(current.line) };
        let mut bytes = serde_json::to_vec_pretty(&next).map_err(std::io::Error::from)?;
        bytes.push(b'\n');
        write_file_atomic(cursor_file, &bytes)?;
        Ok(next)
    })
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
