//! CLI help output specs: argument parsing itself is clap's job (spec.md
//! §1 excludes rich help/onboarding text from the core), but the thin
//! subcommand tree clap derives must still be reachable.

use crate::prelude::*;

#[test]
fn port_help_lists_subcommands() {
    let project = Project::new();
    let out = project.cmd().arg("--help").assert().passes().stdout_string();
    assert!(out.contains("task"));
    assert!(out.contains("host-service"));
    assert!(out.contains("registry"));
}

#[test]
fn port_task_help_lists_subcommands() {
    let project = Project::new();
    let out = project.cmd().args(["task", "--help"]).assert().passes().stdout_string();
    for sub in ["create", "list", "show", "cancel", "daemon", "worker"] {
        assert!(out.contains(sub), "missing `{sub}` in task help: {out}");
    }
}

#[test]
fn port_with_no_args_exits_non_zero_with_usage() {
    let project = Project::new();
    let assert = project.cmd().assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("Usage:"));
}
