// SPDX-License-Identifier: MIT

//! `port registry ...` — read-only queries against the global registry.

use anyhow::Result;
use clap::{Args, Subcommand};
use port_storage::{GlobalPaths, RegistryStore};

#[derive(Args)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommand,
}

#[derive(Subcommand)]
pub enum RegistryCommand {
    /// List every `(repo, branch, ports)` entry.
    Projects,
    /// List every registered host service.
    HostServices,
}

pub fn run(args: RegistryArgs) -> Result<()> {
    let global_paths = GlobalPaths::discover();
    let registry = RegistryStore::new(&global_paths);

    match args.command {
        RegistryCommand::Projects => {
            let projects = registry.get_all_projects();
            if projects.is_empty() {
                println!("no registered projects");
            }
            for p in projects {
                println!("{} @ {} -> ports {:?}", p.repo.display(), p.branch, p.ports);
            }
        }
        RegistryCommand::HostServices => {
            let services = registry.get_all_host_services();
            if services.is_empty() {
                println!("no registered host services");
            }
            for s in services {
                println!(
                    "{} @ {} logicalPort={} -> actualPort={} pid={}",
                    s.repo.display(),
                    s.branch,
                    s.logical_port,
                    s.actual_port,
                    s.pid,
                );
            }
        }
    }
    Ok(())
}
