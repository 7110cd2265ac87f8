// SPDX-License-Identifier: MIT

//! The host auxiliary-service manager: runs a developer's
//! own long-lived process (a dev server, a worker, anything that isn't
//! containerized) but routes it through the shared reverse-proxy the same
//! way a containerized stack would be.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use port_core::HostServiceEntry;
use port_routing::{RepoConfig, StaticConfigStore};
use port_storage::{GlobalPaths, RegistryStore, RepoPaths};
use tracing::{info, warn};

use crate::error::HostprocResult;
use crate::port_alloc::allocate_ephemeral_port;
use crate::prompt::ReplacePrompt;
use crate::proxy::ProxySupervisor;
use crate::repo::find_repo_root;
use crate::signals::wait_for_any;

const PROXY_CONTAINER_NAME: &str = "port-traefik";
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    AlreadyStopped,
    SigTerm,
    SigKill,
}

/// Runs `argv` as a host auxiliary service reachable through the shared
/// proxy at `<branch>.<domain>` on `logical_port`. Returns the process's
/// exit code (or the signal-mapped code if `run` itself was signalled).
pub async fn run(
    cwd: &Path,
    branch: &str,
    logical_port: u16,
    argv: &[String],
    prompt: &dyn ReplacePrompt,
    proxy: &dyn ProxySupervisor,
) -> HostprocResult<i32> {
    let repo_root = find_repo_root(cwd)?;
    let repo_paths = RepoPaths::new(&repo_root);
    let config = RepoConfig::load(&repo_paths.config_file())?;

    let global_paths = GlobalPaths::discover();
    let registry = RegistryStore::new(&global_paths);
    registry.sweep_stale_host_services(is_alive)?;

    if let Some(existing) = registry.get_host_service(&repo_root, branch, logical_port) {
        if !prompt.should_replace(&existing) {
            info!(branch, logical_port, "reusing existing host service");
            return Ok(0);
        }
        stop_host_service(&registry, &existing, Duration::from_secs(2))?;
    }

    let actual_port = allocate_ephemeral_port()?;

    let static_store = StaticConfigStore::new(&global_paths);
    static_store.ensure_dynamic_dir()?;
    static_store.ensure_ports(&[logical_port])?;
    proxy.ensure_running(&global_paths.traefik_compose_file(), PROXY_CONTAINER_NAME).await?;

    let config_file = global_paths.traefik_dynamic_dir().join(format!("{branch}-{logical_port}.yml"));
    write_dynamic_routing_file(&config_file, branch, &config.domain, logical_port, actual_port)?;

    let mut entry = HostServiceEntry {
        repo: repo_root.clone(),
        branch: branch.to_string(),
        logical_port,
        actual_port,
        pid: 0,
        config_file: config_file.clone(),
    };
    registry.register_host_service(entry.clone())?;

    let mut child = match tokio::process::Command::new(&argv[0])
        .args(&argv[1..])
        .current_dir(&repo_root)
        .env("PORT", actual_port.to_string())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            cleanup(&registry, &entry);
            return Err(e.into());
        }
    };

    let Some(pid) = child.id() else {
        cleanup(&registry, &entry);
        return Ok(1);
    };
    entry.pid = pid;
    registry.register_host_service(entry.clone())?;

    let exit_code = tokio::select! {
        signal = wait_for_any() => {
            let signal = signal.map_err(std::io::Error::from)?;
            let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
            let _ = child.wait().await;
            signal.exit_code()
        }
        status = child.wait() => {
            match status {
                Ok(status) => status.code().unwrap_or(1),
                Err(e) => {
                    warn!(error = %e, "failed to wait on host service child");
                    1
                }
            }
        }
    };

    cleanup(&registry, &entry);
    Ok(exit_code)
}

/// Stops a registered host service. `already_stopped | sigterm | sigkill`
///: always cleans up the dynamic file and registry entry,
/// even when the pid was already gone.
pub fn stop_host_service(
    registry: &RegistryStore,
    svc: &HostServiceEntry,
    grace_period: Duration,
) -> HostprocResult<StopOutcome> {
    if !is_alive(svc.pid) {
        cleanup(registry, svc);
        return Ok(StopOutcome::AlreadyStopped);
    }

    let _ = signal::kill(Pid::from_raw(svc.pid as i32), Signal::SIGTERM);

    let deadline = std::time::Instant::now() + grace_period;
    let mut outcome = StopOutcome::SigTerm;
    while is_alive(svc.pid) {
        if std::time::Instant::now() >= deadline {
            let _ = signal::kill(Pid::from_raw(svc.pid as i32), Signal::SIGKILL);
            outcome = StopOutcome::SigKill;
            break;
        }
        std::thread::sleep(STOP_POLL_INTERVAL);
    }

    cleanup(registry, svc);
    Ok(outcome)
}

fn cleanup(registry: &RegistryStore, svc: &HostServiceEntry) {
    if let Err(e) = std::fs::remove_file(&svc.config_file) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %svc.config_file.display(), error = %e, "failed to remove dynamic routing file");
        }
    }
    if let Err(e) = registry.unregister_host_service(&svc.repo, &svc.branch, svc.logical_port) {
        warn!(error = %e, "failed to unregister host service");
    }
}

fn is_alive(pid: u32) -> bool {
    pid != 0 && signal::kill(Pid::from_raw(pid as i32), None).is_ok()
}

fn write_dynamic_routing_file(
    path: &Path,
    branch: &str,
    domain: &str,
    logical_port: u16,
    actual_port: u16,
) -> HostprocResult<()> {
    use serde_yaml::{Mapping, Value};

    let router_name = format!("{branch}-host-{logical_port}");
    let entrypoint = format!("port{logical_port}");
    let rule = format!("Host(`{branch}.{domain}`)");
    let url = format!("http://host.docker.internal:{actual_port}");

    let mut router = Mapping::new();
    router.insert(Value::from("rule"), Value::from(rule));
    router.insert(Value::from("entryPoints"), Value::Sequence(vec![Value::from(entrypoint)]));
    router.insert(Value::from("service"), Value::from(router_name.clone()));

    let mut routers = Mapping::new();
    routers.insert(Value::from(router_name.clone()), Value::Mapping(router));

    let mut server = Mapping::new();
    server.insert(Value::from("url"), Value::from(url));

    let mut load_balancer = Mapping::new();
    load_balancer.insert(Value::from("servers"), Value::Sequence(vec![Value::Mapping(server)]));

    let mut service = Mapping::new();
    service.insert(Value::from("loadBalancer"), Value::Mapping(load_balancer));

    let mut services = Mapping::new();
    services.insert(Value::from(router_name), Value::Mapping(service));

    let mut http = Mapping::new();
    http.insert(Value::from("routers"), Value::Mapping(routers));
    http.insert(Value::from("services"), Value::Mapping(services));

    let mut doc = Mapping::new();
    doc.insert(Value::from("http"), Value::Mapping(http));

    let yaml = serde_yaml::to_string(&Value::Mapping(doc)).unwrap_or_default();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, yaml)?;
    Ok(())
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
