// SPDX-License-Identifier: MIT

//! Asking whether to replace an already-registered host service. The
//! prompt is a collaborator so `run` stays testable: the CLI wires up
//! [`StdinPrompt`], tests wire up a fixed answer.

use port_core::HostServiceEntry;

pub trait ReplacePrompt: Send + Sync {
    fn should_replace(&self, existing: &HostServiceEntry) -> bool;
}

/// Asks on the controlling terminal; defaults to "don't replace" on EOF or
/// an unparseable answer, since leaving the running service alone is the
/// safer failure mode.
pub struct StdinPrompt;

impl ReplacePrompt for StdinPrompt {
    fn should_replace(&self, existing: &HostServiceEntry) -> bool {
        use std::io::Write;

        print!(
            "a host service for branch {:?} on port {} is already running (pid {}). Replace it? [y/N] ",
            existing.branch, existing.logical_port, existing.pid
        );
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
