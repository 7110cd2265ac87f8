// SPDX-License-Identifier: MIT

//! The shared reverse-proxy's routing-config reconciler.
//!
//! A single well-known directory holds the proxy's static config, its
//! compose file, and a dynamic-config subdirectory that host auxiliary
//! services write into. Every mutation goes through one lock.

use std::collections::BTreeSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use port_storage::lock::{with_file_lock, write_file_atomic, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
use port_storage::GlobalPaths;
use serde::{Deserialize, Serialize};

use crate::error::{RoutingError, RoutingResult};
use crate::override_gen::SHARED_PROXY_NETWORK;

const WEB_ENTRYPOINT_PORT: u16 = 80;
const PROXY_CONTAINER_NAME: &str = "port-traefik";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StaticConfig {
    #[serde(rename = "entryPoints")]
    entry_points: IndexMap<String, EntryPoint>,
    providers: Providers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryPoint {
    address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Providers {
    docker: DockerProvider,
    file: FileProvider,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DockerProvider {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "exposedByDefault")]
    exposed_by_default: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileProvider {
    directory: String,
    watch: bool,
}

/// Reconciles `<user-home>/.port/traefik/{traefik.yml,docker-compose.yml,dynamic/}`.
pub struct StaticConfigStore {
    lock_file: PathBuf,
    static_config_file: PathBuf,
    compose_file: PathBuf,
    dynamic_dir: PathBuf,
}

impl StaticConfigStore {
    pub fn new(paths: &GlobalPaths) -> Self {
        Self {
            lock_file: paths.traefik_lock(),
            static_config_file: paths.traefik_static_config(),
            compose_file: paths.traefik_compose_file(),
            dynamic_dir: paths.traefik_dynamic_dir(),
        }
    }

    pub fn ensure_dynamic_dir(&self) -> RoutingResult<()> {
        std::fs::create_dir_all(&self.dynamic_dir)?;
        Ok(())
    }

    /// Sorted, deduplicated ports found on `port<N>` entrypoints in the
    /// static config. An absent or corrupt file parses as no ports.
    pub fn get_configured_ports(&self) -> RoutingResult<Vec<u16>> {
        let Some(text) = read_optional_io(&self.static_config_file)? else {
            return Ok(Vec::new());
        };
        Ok(ports_from_static_config(&text))
    }

    /// Returns `true` if the static config and compose file were regenerated.
    pub fn ensure_ports(&self, required: &[u16]) -> RoutingResult<bool> {
        with_file_lock(&self.lock_file, DEFAULT_TIMEOUT, DEFAULT_RETRY_DELAY, || {
            let required_set: BTreeSet<u16> = required.iter().copied().collect();
            let existing_text = read_optional_io(&self.static_config_file)?;
            let configured_set: BTreeSet<u16> =
                existing_text.as_deref().map(ports_from_static_config).unwrap_or_default().into_iter().collect();

            let files_exist = self.static_config_file.exists() && self.compose_file.exists();
            let file_provider_present = existing_text.as_deref().is_some_and(has_file_provider);

            if required_set.is_subset(&configured_set) && files_exist && file_provider_present {
                return Ok(false);
            }

            let union: BTreeSet<u16> = configured_set.union(&required_set).copied().collect();
            let static_yaml = render_static_config(&union, &self.dynamic_dir);
            let compose_yaml = render_compose(&union);
            write_file_atomic(&self.static_config_file, static_yaml.as_bytes())?;
            write_file_atomic(&self.compose_file, compose_yaml.as_bytes())?;
            Ok(true)
        })
        .map_err(RoutingError::from)
    }

    /// Creates both files with `initial_ports` if absent; never overwrites.
    pub fn init_files(&self, initial_ports: &[u16]) -> RoutingResult<()> {
        with_file_lock(&self.lock_file, DEFAULT_TIMEOUT, DEFAULT_RETRY_DELAY, || {
            let ports: BTreeSet<u16> = initial_ports.iter().copied().collect();
            if !self.static_config_file.exists() {
                write_file_atomic(&self.static_config_file, render_static_config(&ports, &self.dynamic_dir).as_bytes())?;
            }
            if !self.compose_file.exists() {
                write_file_atomic(&self.compose_file, render_compose(&ports).as_bytes())?;
            }
            Ok(())
        })
        .map_err(RoutingError::from)
    }
}

fn read_optional_io(path: &std::path::Path) -> std::io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn ports_from_static_config(text: &str) -> Vec<u16> {
    let Ok(value) = serde_yaml::from_str::<serde_yaml::Value>(text) else {
        return Vec::new();
    };
    let Some(entry_points) = value.get("entryPoints").and_then(|v| v.as_mapping()) else {
        return Vec::new();
    };
    let mut ports: Vec<u16> = entry_points
        .keys()
        .filter_map(|k| k.as_str())
        .filter_map(|k| k.strip_prefix("port"))
        .filter_map(|n| n.parse().ok())
        .collect();
    ports.sort_unstable();
    ports.dedup();
    ports
}

fn has_file_provider(text: &str) -> bool {
    let Ok(value) = serde_yaml::from_str::<serde_yaml::Value>(text) else {
        return false;
    };
    value.get("providers").and_then(|p| p.get("file")).is_some()
}

fn render_static_config(ports: &BTreeSet<u16>, dynamic_dir: &std::path::Path) -> String {
    let mut entry_points = IndexMap::new();
    entry_points.insert("web".to_string(), EntryPoint { address: format!(":{WEB_ENTRYPOINT_PORT}") });
    for port in ports {
        entry_points.insert(format!("port{port}"), EntryPoint { address: format!(":{port}") });
    }

    let config = StaticConfig {
        entry_points,
        providers: Providers {
            docker: DockerProvider { exposed_by_default: Some(false) },
            file: FileProvider { directory: dynamic_dir.display().to_string(), watch: true },
        },
    };

    serde_yaml::to_string(&config).unwrap_or_default()
}

fn render_compose(ports: &BTreeSet<u16>) -> String {
    use serde_yaml::{Mapping, Value};

    let mut service = Mapping::new();
    service.insert(Value::from("image"), Value::from("traefik:v3.0"));
    service.insert(Value::from("container_name"), Value::from(PROXY_CONTAINER_NAME));
    service.insert(Value::from("restart"), Value::from("unless-stopped"));

    let mut port_list: Vec<Value> = vec![Value::from(format!("{WEB_ENTRYPOINT_PORT}:{WEB_ENTRYPOINT_PORT}"))];
    port_list.extend(ports.iter().map(|p| Value::from(format!("{p}:{p}"))));
    service.insert(Value::from("ports"), Value::Sequence(port_list));

    service.insert(
        Value::from("volumes"),
        Value::Sequence(vec![
            Value::from("./traefik.yml:/etc/traefik/traefik.yml:ro"),
            Value::from("./dynamic:/etc/traefik/dynamic:ro"),
            Value::from("/var/run/docker.sock:/var/run/docker.sock:ro"),
        ]),
    );

    let mut networks = Mapping::new();
    networks.insert(Value::from("default"), Value::Null);
    service.insert(Value::from("networks"), Value::Mapping(networks));

    let mut services = Mapping::new();
    services.insert(Value::from("proxy"), Value::Mapping(service));

    let mut doc = Mapping::new();
    doc.insert(Value::from("services"), Value::Mapping(services));

    let mut proxy_network = Mapping::new();
    proxy_network.insert(Value::from("name"), Value::from(SHARED_PROXY_NETWORK));
    let mut networks_section = Mapping::new();
    networks_section.insert(Value::from("default"), Value::Mapping(proxy_network));
    doc.insert(Value::from("networks"), Value::Mapping(networks_section));

    serde_yaml::to_string(&Value::Mapping(doc)).unwrap_or_default()
}

#[cfg(test)]
#[path = "static_config_tests.rs"]
mod tests;
