// SPDX-License-Identifier: MIT

use super::*;

const DOC: &str = r#"
services:
  web:
    container_name: my-app-web
    ports:
      - "18000:8000"
  db:
    ports: []
  cache:
    ports:
      - published: 16379
        target: 6379
"#;

#[test]
fn parses_short_and_long_port_forms() {
    let doc = ComposeDocument::parse(DOC).unwrap();
    assert_eq!(doc.services["web"].ports[0].published, 18000);
    assert_eq!(doc.services["web"].ports[0].target, 8000);
    assert_eq!(doc.services["cache"].ports[0].published, 16379);
    assert_eq!(doc.services["cache"].ports[0].target, 6379);
}

#[test]
fn service_without_ports_parses_as_empty() {
    let doc = ComposeDocument::parse(DOC).unwrap();
    assert!(doc.services["db"].ports.is_empty());
}

#[test]
fn container_name_is_preserved_when_declared() {
    let doc = ComposeDocument::parse(DOC).unwrap();
    assert_eq!(doc.services["web"].container_name.as_deref(), Some("my-app-web"));
}

#[test]
fn short_port_form_with_protocol_suffix_parses_target() {
    let doc = ComposeDocument::parse(
        "services:\n  web:\n    ports:\n      - \"5432:5432/tcp\"\n",
    )
    .unwrap();
    assert_eq!(doc.services["web"].ports[0].target, 5432);
}

#[test]
fn malformed_document_is_an_error() {
    assert!(ComposeDocument::parse("not: [valid, yaml: :").is_err());
}
