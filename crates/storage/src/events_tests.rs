// SPDX-License-Identifier: MIT

use super::*;
use port_core::{EventType, TaskId};
use tempfile::tempdir;

fn event() -> TaskEvent {
    TaskEvent::new(TaskId::new(), EventType::created(), "2026-01-01T00:00:00Z".parse().unwrap())
}

#[test]
fn append_and_read_all_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("all.jsonl");
    append(&path, &event()).unwrap();
    append(&path, &event()).unwrap();
    let events = read_all(&path).unwrap();
    assert_eq!(events.len(), 2);
}

#[test]
fn read_all_on_missing_file_returns_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.jsonl");
    assert!(read_all(&path).unwrap().is_empty());
}

#[test]
fn read_all_skips_corrupt_lines_rather_than_failing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("all.jsonl");
    append(&path, &event()).unwrap();
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "not json").unwrap();
    append(&path, &event()).unwrap();

    let events = read_all(&path).unwrap();
    assert_eq!(events.len(), 2);
}

#[test]
fn read_range_slices_by_line_offset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("all.jsonl");
    for _ in 0..5 {
        append(&path, &event()).unwrap();
    }
    assert_eq!(read_range(&path, 2, 2).unwrap().len(), 2);
    assert_eq!(read_range(&path, 4, 10).unwrap().len(), 1);
}
