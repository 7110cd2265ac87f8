// SPDX-License-Identifier: MIT

//! The subscriber dispatcher: reads the global event stream
//! with a per-consumer cursor and lets a configured handler react to each
//! unseen event. The cursor only advances after the whole batch is handled
//! without error, so a crash mid-batch redelivers it rather than skipping
//! it.

use std::path::{Path, PathBuf};

use port_core::TaskEvent;
use port_storage::{cursor, events};

use crate::error::EngineResult;

/// Events delivered to a subscriber in one dispatch call, matching the
/// daemon's 1Hz tick cadence: large enough that a
/// subscriber never meaningfully falls behind, small enough that one slow
/// consumer can't stall the loop on a pathologically large log.
pub const DEFAULT_BATCH_LIMIT: usize = 200;

/// A subscriber's reaction to one delivered event. The built-in `opencode`
/// handler is one concrete instance of this trait; new consumers plug in
/// here without the dispatcher or the daemon loop changing.
pub trait SubscriberHandler: Send + Sync {
    fn name(&self) -> &str;
    fn handle(&self, event: &TaskEvent) -> EngineResult<()>;
}

/// Delivers the next unseen batch (up to `limit` events) to `handler`,
/// advancing its cursor only on clean completion. Returns the number of
/// events delivered (`0` if the consumer was already caught up).
pub fn dispatch_one(
    all_events_log: &Path,
    cursor_file: &Path,
    cursor_lock: &Path,
    handler: &dyn SubscriberHandler,
    limit: usize,
) -> EngineResult<usize> {
    let cursor = cursor::get(cursor_file);
    let batch = events::read_range(all_events_log, cursor.line, limit)?;
    if batch.is_empty() {
        return Ok(0);
    }

    for event in &batch {
        handler.handle(event)?;
    }

    let delivered = batch.len();
    cursor::advance(cursor_file, cursor_lock, |line| line + delivered)?;
    Ok(delivered)
}

/// Writes one notification line per event to
/// `subscribers/opencode.notifications.log`. The format is
/// XML-ish rather than JSON so a human tailing the file can read it without
/// a pretty-printer.
pub struct OpencodeHandler {
    notifications_log: PathBuf,
}

impl OpencodeHandler {
    pub fn new(notifications_log: impl Into<PathBuf>) -> Self {
        Self { notifications_log: notifications_log.into() }
    }
}

impl SubscriberHandler for OpencodeHandler {
    fn name(&self) -> &str {
        "opencode"
    }

    fn handle(&self, event: &TaskEvent) -> EngineResult<()> {
        use std::io::Write;

        if let Some(parent) = self.notifications_log.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&self.notifications_log)?;
        let line = format!(
            "<notification task=\"{}\" type=\"{}\" at=\"{}\">{}</notification>",
            event.task_id,
            event.event_type,
            event.at.to_rfc3339(),
            event.message.as_deref().unwrap_or(""),
        );
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
