// SPDX-License-Identifier: MIT

use super::*;

#[tokio::test]
async fn nonexistent_container_is_reported_not_running() {
    assert!(!is_container_running("port-hostproc-tests-no-such-container").await);
}
