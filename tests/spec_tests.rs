#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use apisail::spec::{description_slug, load_description, ApiDescription};
use common::{description_file, fixtures};
use http::Method;

const YAML_DESCRIPTION: &str = r#"
title: Test API
resources:
  - path: /items/{id}
    methods:
      - verb: put
        query_parameters:
          - name: debug
          - name: x.trace
            example: "on"
            optional: false
        responses:
          - status: 200
            headers:
              - name: etag
                example: abc
            bodies:
              - media_type: application/json
                example: '{"id": "123"}'
"#;

#[test]
fn test_load_description_yaml_and_json() {
    let yaml_file = description_file(YAML_DESCRIPTION, ".yaml");
    let from_yaml = load_description(yaml_file.path()).unwrap();

    let parsed: ApiDescription = serde_yaml::from_str(YAML_DESCRIPTION).unwrap();
    let json_file = description_file(&serde_json::to_string(&parsed).unwrap(), ".json");
    let from_json = load_description(json_file.path()).unwrap();

    assert_eq!(from_yaml, from_json);
    assert_eq!(description_slug(&from_yaml), "test_api");

    let method = from_yaml.methods().next().unwrap();
    assert_eq!(*method.verb(), Method::PUT);
    assert_eq!(method.parent().path, "/items/{id}");

    let params = method.query_parameters();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name, "debug");
    assert!(params[0].optional);
    assert_eq!(params[1].name, "x.trace");
    assert!(!params[1].optional);
    assert_eq!(params[1].example.as_deref(), Some("on"));

    let response = method.responses().next().unwrap();
    assert_eq!(response.response.status, 200);
    let body = response.bodies().next().unwrap();
    assert_eq!(body.body.media_type, "application/json");
    assert_eq!(body.parent().headers[0].name, "etag");
}

#[test]
fn test_load_fixture_keeps_declaration_order() {
    let description = load_description(fixtures::my_blog()).unwrap();
    let order: Vec<String> = description.methods().map(|m| m.location()).collect();
    assert_eq!(order, vec!["GET /posts", "POST /posts", "GET /posts/{id}"]);
    let found = description.find_method(&Method::POST, "/posts").unwrap();
    assert_eq!(found.method.responses[0].status, 201);
}

#[test]
fn test_missing_file_names_the_path() {
    let err = load_description("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.yaml"));
}

#[test]
fn test_malformed_snapshot_is_an_error() {
    let file = description_file("resources:\n  - methods: 7\n", ".yaml");
    assert!(load_description(file.path()).is_err());
}
