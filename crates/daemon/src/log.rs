// SPDX-License-Identifier: MIT

//! Daemon logging setup: a non-blocking file appender at
//! `jobs/runtime/daemon.log`, filterable with `RUST_LOG`/`PORT_LOG`.
//!
//! The returned [`tracing_appender::non_blocking::WorkerGuard`] must be kept
//! alive for the lifetime of the process; dropping it flushes and stops the
//! background writer thread.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber, writing to `<repo>/.port/jobs/runtime/daemon.log`.
/// Returns the guard the caller must hold for the process's lifetime.
pub fn init(runtime_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(runtime_dir)?;
    let file_appender = tracing_appender::rolling::never(runtime_dir, "daemon.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = std::env::var("PORT_LOG")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();

    Ok(guard)
}
