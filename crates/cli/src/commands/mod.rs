// SPDX-License-Identifier: MIT

//! Subcommand implementations. Each module owns one top-level verb group
//! and talks to the library crates directly — there is no daemon RPC layer,
//! the CLI and the daemon share the same on-disk state.

pub mod host_service;
pub mod registry;
pub mod task;
