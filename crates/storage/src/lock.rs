// SPDX-License-Identifier: MIT

//! The locking primitive every mutation goes through.
//!
//! `with_file_lock` acquires exclusive ownership of `path` by creating it
//! with open-exclusive semantics (fails if it already exists), retrying on
//! collision until `timeout` elapses. The file is also `flock`'d while held:
//! a process that crashes mid-section leaves the lock file on disk, but its
//! `flock` is released by the kernel, so the next acquirer can detect and
//! steal a stale lock instead of waiting out the full timeout for a lock
//! nobody holds anymore.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(25);

pub struct LockGuard {
    path: PathBuf,
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.path);
    }
}

/// Acquires the named lock, runs `f` while holding it, and releases it
/// (unlinking the lock file) before returning. Retries on contention until
/// `timeout`, sleeping `retry_delay` between attempts.
pub fn with_file_lock<T>(
    path: &Path,
    timeout: Duration,
    retry_delay: Duration,
    f: impl FnOnce() -> StorageResult<T>,
) -> StorageResult<T> {
    let _guard = acquire(path, timeout, retry_delay)?;
    f()
}

fn acquire(path: &Path, timeout: Duration, retry_delay: Duration) -> StorageResult<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let deadline = Instant::now() + timeout;
    loop {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => {
                file.try_lock_exclusive().map_err(io::Error::from)?;
                return Ok(LockGuard { path: path.to_path_buf(), file });
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if try_steal_stale_lock(path) {
                    continue;
                }
                if Instant::now() >= deadline {
                    return Err(StorageError::LockTimeout { path: path.to_path_buf() });
                }
                std::thread::sleep(retry_delay);
            }
            Err(e) => return Err(StorageError::Io(e)),
        }
    }
}

/// If the existing lock file's owner crashed without releasing its `flock`,
/// the kernel already dropped that lock; we can take it ourselves and
/// unlink the orphaned file. Returns true if a stale lock was removed.
fn try_steal_stale_lock(path: &Path) -> bool {
    let Ok(existing) = OpenOptions::new().write(true).open(path) else {
        return false;
    };
    if existing.try_lock_exclusive().is_ok() {
        let _ = fs2::FileExt::unlock(&existing);
        let _ = fs::remove_file(path);
        true
    } else {
        false
    }
}

/// Writes `bytes` to `path` by writing to a sibling temp file and renaming
/// over `path`. The temp name embeds the pid and a uuid so
/// concurrent writers from different processes never collide.
pub fn write_file_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension(format!(
        "{}.{}.tmp",
        std::process::id(),
        Uuid::new_v4()
    ));
    let write_result = fs::write(&tmp_path, bytes);
    if write_result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        write_result?;
        return Ok(());
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StorageError::Io(e));
    }
    Ok(())
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
