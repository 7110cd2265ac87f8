// SPDX-License-Identifier: MIT

use super::*;
use tempfile::tempdir;

fn now() -> DateTime<Utc> {
    "2026-01-01T00:00:00Z".parse().unwrap()
}

#[test]
fn write_then_read_round_trips() {
    let dir = tempdir().unwrap();
    let file = DaemonStateFile::new(dir.path().join("daemon.json"));
    let state = new_starting(now());
    file.write(&state).unwrap();
    let read_back = file.read().unwrap();
    assert_eq!(read_back.pid, state.pid);
    assert_eq!(read_back.id, state.id);
}

#[test]
fn missing_file_reads_as_none() {
    let dir = tempdir().unwrap();
    let file = DaemonStateFile::new(dir.path().join("missing.json"));
    assert!(file.read().is_none());
}

#[test]
fn existing_daemon_is_alive_checks_pid_liveness() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon.json");
    let file = DaemonStateFile::new(&path);
    let state = new_starting(now());
    file.write(&state).unwrap();

    assert!(existing_daemon_is_alive(&path, |_| true).is_some());
    assert!(existing_daemon_is_alive(&path, |_| false).is_none());
}

#[test]
fn idle_expired_only_after_idle_since_plus_duration() {
    let mut state = new_starting(now());
    assert!(!idle_expired(&state, now(), chrono::Duration::seconds(10)));

    mark_idle(&mut state, now());
    assert!(!idle_expired(&state, now() + chrono::Duration::seconds(5), chrono::Duration::seconds(10)));
    assert!(idle_expired(&state, now() + chrono::Duration::seconds(10), chrono::Duration::seconds(10)));
}

#[test]
fn clear_idle_resets_idle_since() {
    let mut state = new_starting(now());
    mark_idle(&mut state, now());
    assert!(state.idle_since.is_some());
    clear_idle(&mut state);
    assert!(state.idle_since.is_none());
}
