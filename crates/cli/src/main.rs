// SPDX-License-Identifier: MIT

//! `port` — the CLI entry point. Argument parsing is intentionally thin:
//! every subcommand is a direct call into the library crates that own the
//! actual behavior, so the daemon and worker self-spawn paths (`task daemon
//! --serve --repo ...`, `task worker --task-id ... --repo ... --worktree
//! ...`) stay in lockstep with the commands a person would type by hand.

mod commands;
mod repo;

use clap::{Parser, Subcommand};

use commands::{host_service, registry, task};

#[derive(Parser)]
#[command(name = "port", version = env!("BUILD_GIT_HASH"))]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create, list, inspect, and cancel tasks; also the daemon/worker self-spawn entry points.
    Task(task::TaskArgs),
    /// Run or stop a host-local auxiliary process behind the shared reverse-proxy.
    HostService(host_service::HostServiceArgs),
    /// Read-only queries against the global registry.
    Registry(registry::RegistryArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Task(args) => task::run(args).await,
        Command::HostService(args) => host_service::run(args).await,
        Command::Registry(args) => registry::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
