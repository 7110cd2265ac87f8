// SPDX-License-Identifier: MIT

//! Name sanitization for generated container names and branch-derived
//! hostnames.

use sha2::{Digest, Sha256};

const MAX_CONTAINER_NAME_LEN: usize = 128;
const HASH_SUFFIX_LEN: usize = 8;

/// Normalizes `input` to `[a-z0-9][a-z0-9_.-]*`, truncating with a stable
/// hash suffix when the result would exceed 128 characters.
pub fn sanitize_container_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-') {
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push('-');
        }
    }
    while out.starts_with(['_', '.', '-']) {
        out.remove(0);
    }
    if out.is_empty() {
        out.push('x');
    }

    if out.len() <= MAX_CONTAINER_NAME_LEN {
        return out;
    }

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let suffix: String = digest.iter().map(|b| format!("{b:02x}")).collect::<String>().chars().take(HASH_SUFFIX_LEN).collect();

    let keep = MAX_CONTAINER_NAME_LEN - HASH_SUFFIX_LEN - 1;
    out.truncate(keep);
    format!("{out}-{suffix}")
}

/// Sanitizes a branch name for use as a filesystem path component
/// (`<repo>/.port/trees/<branchSanitized>/`).
pub fn sanitize_branch_for_path(branch: &str) -> String {
    branch.chars().map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '-' }).collect()
}

#[cfg(test)]
#[path = "slug_tests.rs"]
mod tests;
