// SPDX-License-Identifier: MIT

//! Signal-to-exit-code mapping for the host auxiliary-service manager
//!: SIGINT→130, SIGTERM→143, SIGHUP→129 — the usual
//! `128 + signal number` convention shells use for signal-terminated
//! children.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostServiceSignal {
    Int,
    Term,
    Hup,
}

impl HostServiceSignal {
    pub fn exit_code(self) -> i32 {
        match self {
            HostServiceSignal::Int => 130,
            HostServiceSignal::Term => 143,
            HostServiceSignal::Hup => 129,
        }
    }
}

/// Waits for whichever of SIGINT/SIGTERM/SIGHUP arrives first.
pub async fn wait_for_any() -> std::io::Result<HostServiceSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut int = signal(SignalKind::interrupt())?;
    let mut term = signal(SignalKind::terminate())?;
    let mut hup = signal(SignalKind::hangup())?;

    Ok(tokio::select! {
        _ = int.recv() => HostServiceSignal::Int,
        _ = term.recv() => HostServiceSignal::Term,
        _ = hup.recv() => HostServiceSignal::Hup,
    })
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
