// SPDX-License-Identifier: MIT

use tempfile::tempdir;

use super::*;

#[tokio::test]
async fn fails_fast_when_repo_has_no_config() {
    let dir = tempdir().unwrap();
    let result = serve(dir.path()).await;
    assert!(result.is_err());
}
