//! `port registry host-services` — read-only view over registered host
//! auxiliary processes (spec.md §4.B).

use crate::prelude::*;

#[test]
fn empty_registry_reports_no_host_services() {
    let project = Project::new();
    let out = project.cmd().args(["registry", "host-services"]).assert().passes().stdout_string();
    assert!(out.contains("no registered host services"));
}

#[test]
fn reads_back_seeded_host_service_entry() {
    let project = Project::new();
    let repo = project.root().display().to_string().replace('\\', "\\\\");
    project.write_registry(&format!(
        r#"{{"projects":[],"hostServices":[{{"repo":"{repo}","branch":"feature-a","logicalPort":4000,"actualPort":54321,"pid":999999,"configFile":"/tmp/feature-a-4000.yml"}}]}}"#
    ));

    let out = project.cmd().args(["registry", "host-services"]).assert().passes().stdout_string();
    assert!(out.contains("logicalPort=4000"));
    assert!(out.contains("actualPort=54321"));
    assert!(out.contains("pid=999999"));
}
