// SPDX-License-Identifier: MIT

//! `port host-service ...` — run/stop a host-local auxiliary process behind
//! the shared reverse-proxy.

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use port_hostproc::prompt::StdinPrompt;
use port_hostproc::proxy::DockerComposeProxySupervisor;
use port_hostproc::{repo::find_repo_root, service, stop_host_service};
use port_storage::{GlobalPaths, RegistryStore};

const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);

#[derive(Args)]
pub struct HostServiceArgs {
    #[command(subcommand)]
    pub command: HostServiceCommand,
}

#[derive(Subcommand)]
pub enum HostServiceCommand {
    /// Run `argv` as a host service reachable at `<branch>.<domain>` on `port`.
    Run {
        #[arg(long)]
        branch: String,
        #[arg(long)]
        port: u16,
        /// The command and its arguments, after `--`.
        #[arg(last = true)]
        argv: Vec<String>,
    },
    /// Stop a previously registered host service.
    Stop {
        #[arg(long)]
        branch: String,
        #[arg(long)]
        port: u16,
    },
}

pub async fn run(args: HostServiceArgs) -> Result<()> {
    match args.command {
        HostServiceCommand::Run { branch, port, argv } => run_service(branch, port, argv).await,
        HostServiceCommand::Stop { branch, port } => stop_service(branch, port),
    }
}

async fn run_service(branch: String, port: u16, argv: Vec<String>) -> Result<()> {
    if argv.is_empty() {
        return Err(anyhow!("host-service run requires a command after `--`"));
    }
    let cwd = std::env::current_dir()?;
    let exit_code =
        service::run(&cwd, &branch, port, &argv, &StdinPrompt, &DockerComposeProxySupervisor).await?;
    std::process::exit(exit_code);
}

fn stop_service(branch: String, port: u16) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let repo_root = find_repo_root(&cwd)?;

    let global_paths = GlobalPaths::discover();
    let registry = RegistryStore::new(&global_paths);
    let svc = registry
        .get_host_service(&repo_root, &branch, port)
        .ok_or_else(|| anyhow!("no host service registered for branch {branch:?} on port {port}"))?;

    let outcome = stop_host_service(&registry, &svc, STOP_GRACE_PERIOD)?;
    println!("{:?}", outcome);
    Ok(())
}
