// SPDX-License-Identifier: MIT

//! Parsing the per-worktree compose document that the override generator
//! reads from. Only the fields the generator needs are
//! modeled; everything else in the document is irrelevant to this crate.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{RoutingError, RoutingResult};

#[derive(Debug, Clone, Deserialize)]
pub struct ComposeDocument {
    #[serde(default)]
    pub services: IndexMap<String, ComposeService>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComposeService {
    pub container_name: Option<String>,
    #[serde(default)]
    pub ports: Vec<PortEntry>,
}

/// A `ports:` entry, accepting both the short `"18000:8000"` form and the
/// long mapping form compose also allows.
#[derive(Debug, Clone)]
pub struct PortEntry {
    pub published: u16,
    pub target: u16,
}

impl<'de> Deserialize<'de> for PortEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Short(String),
            Long { published: u16, target: u16 },
        }

        match Raw::deserialize(deserializer)? {
            Raw::Short(s) => parse_short_port(&s).map_err(serde::de::Error::custom),
            Raw::Long { published, target } => Ok(PortEntry { published, target }),
        }
    }
}

fn parse_short_port(s: &str) -> Result<PortEntry, String> {
    let (published, target) = s.split_once(':').ok_or_else(|| format!("unresolvable port mapping: {s:?}"))?;
    let published: u16 = published.trim().parse().map_err(|_| format!("invalid published port: {published:?}"))?;
    let target = target.split('/').next().unwrap_or(target);
    let target: u16 = target.trim().parse().map_err(|_| format!("invalid target port: {target:?}"))?;
    Ok(PortEntry { published, target })
}

impl ComposeDocument {
    pub fn parse(yaml: &str) -> RoutingResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| RoutingError::InvalidCompose(e.to_string()))
    }
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
