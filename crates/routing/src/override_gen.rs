// SPDX-License-Identifier: MIT

//! The per-stack override generator: a pure function from a
//! parsed compose document to a deterministic override YAML document.

use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};

use crate::compose::ComposeDocument;
use crate::slug::sanitize_container_name;

pub const SHARED_PROXY_NETWORK: &str = "port_proxy";

/// Generates the override document. Deterministic: identical inputs yield a
/// byte-identical serialization, since
/// `IndexMap`/`serde_yaml::Mapping` preserve insertion order and every value
/// here is derived solely from `compose`, `branch`, `domain`, `project_name`.
pub fn generate_override(
    compose: &ComposeDocument,
    branch: &str,
    domain: &str,
    project_name: &str,
) -> String {
    let mut services = Mapping::new();

    for (service_name, service) in &compose.services {
        let mut entry = Mapping::new();
        let mut touched = false;

        if let Some(_fixed_name) = &service.container_name {
            let rewritten = sanitize_container_name(&format!("{project_name}-{service_name}"));
            entry.insert(Value::from("container_name"), Value::from(rewritten));
            touched = true;
        }

        if !service.ports.is_empty() {
            let mut labels = Mapping::new();
            for port in &service.ports {
                let router_name = format!("{branch}-{service_name}-{}", port.published);
                let host_rule = format!("Host(`{branch}.{domain}`)");
                let host_sni_rule = format!("HostSNI(`{branch}.{domain}`)");
                let entrypoint = format!("port{}", port.published);

                labels.insert(
                    Value::from(format!("traefik.http.routers.{router_name}.rule")),
                    Value::from(host_rule),
                );
                labels.insert(
                    Value::from(format!("traefik.http.routers.{router_name}.entrypoints")),
                    Value::from(entrypoint.clone()),
                );
                labels.insert(
                    Value::from(format!("traefik.http.routers.{router_name}.service")),
                    Value::from(router_name.clone()),
                );
                labels.insert(
                    Value::from(format!("traefik.http.services.{router_name}.loadbalancer.server.port")),
                    Value::from(port.target),
                );

                labels.insert(
                    Value::from(format!("traefik.tcp.routers.{router_name}.rule")),
                    Value::from(host_sni_rule),
                );
                labels.insert(
                    Value::from(format!("traefik.tcp.routers.{router_name}.tls")),
                    Value::from(true),
                );
                labels.insert(
                    Value::from(format!("traefik.tcp.routers.{router_name}.entrypoints")),
                    Value::from(entrypoint),
                );
                labels.insert(
                    Value::from(format!("traefik.tcp.routers.{router_name}.service")),
                    Value::from(router_name.clone()),
                );
                labels.insert(
                    Value::from(format!("traefik.tcp.services.{router_name}.loadbalancer.server.port")),
                    Value::from(port.target),
                );
            }
            entry.insert(Value::from("labels"), Value::Mapping(labels));

            let override_ports = Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new("override"),
                value: Value::Sequence(Vec::new()),
            }));
            entry.insert(Value::from("ports"), override_ports);

            let mut networks = Mapping::new();
            networks.insert(Value::from("default"), Value::Null);
            networks.insert(Value::from(SHARED_PROXY_NETWORK), Value::Null);
            entry.insert(Value::from("networks"), Value::Mapping(networks));

            touched = true;
        }

        if touched {
            services.insert(Value::from(service_name.clone()), Value::Mapping(entry));
        }
    }

    let mut doc = Mapping::new();
    doc.insert(Value::from("services"), Value::Mapping(services));

    let mut proxy_network = Mapping::new();
    proxy_network.insert(Value::from("external"), Value::from(true));
    let mut networks = Mapping::new();
    networks.insert(Value::from(SHARED_PROXY_NETWORK), Value::Mapping(proxy_network));
    doc.insert(Value::from("networks"), Value::Mapping(networks));

    serde_yaml::to_string(&Value::Mapping(doc)).unwrap_or_default()
}

#[cfg(test)]
#[path = "override_gen_tests.rs"]
mod tests;
