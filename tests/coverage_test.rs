use apidog_test::commands::execute_compare;
use std::fs;
use tempfile::TempDir;

const OPENAPI: &str = r#"
openapi: 3.0.0
info:
  title: Shop API
  version: 1.0.0
paths:
  /users:
    get:
      operationId: listUsers
      tags: [users]
      responses:
        '200':
          description: OK
  /orders/{id}:
    get:
      operationId: getOrder
      tags: [orders]
      responses:
        '200':
          description: OK
    delete:
      operationId: deleteOrder
      tags: [orders]
      responses:
        '204':
          description: Deleted
"#;

const SCENARIO: &str = r#"
name: Order lookup
steps:
  - type: http
    number: 1
    method: get
    path: /orders/:id/
"#;

#[test]
fn compare_reports_untested_endpoints_grouped_by_tag() {
    let dir = TempDir::new().unwrap();
    let openapi = dir.path().join("openapi.yaml");
    fs::write(&openapi, OPENAPI).unwrap();

    let scenarios = dir.path().join("scenarios");
    fs::create_dir(&scenarios).unwrap();
    fs::write(scenarios.join("orders.yaml"), SCENARIO).unwrap();

    let report_path = dir.path().join("report.json");
    execute_compare(&openapi, &scenarios, None, Some(&report_path)).unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();

    assert_eq!(report["total"], 3);
    // "/orders/:id/" normalizes to "/orders/{id}" and matches the spec key
    assert_eq!(report["tested"], 1);

    let untested = report["untested"].as_array().unwrap();
    let tags: Vec<&str> = untested
        .iter()
        .map(|g| g["tag"].as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["orders", "users"]);

    let orders = &untested[0]["endpoints"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["method"], "DELETE");
}

#[test]
fn compare_fails_on_unsupported_openapi_version() {
    let dir = TempDir::new().unwrap();
    let openapi = dir.path().join("openapi.yaml");
    fs::write(
        &openapi,
        "openapi: 2.0.0\ninfo:\n  title: Old\n  version: 1.0.0\npaths:\n  /a:\n    get:\n      responses:\n        '200':\n          description: OK\n",
    )
    .unwrap();

    let scenarios = dir.path().join("scenarios");
    fs::create_dir(&scenarios).unwrap();

    let result = execute_compare(&openapi, &scenarios, None, None);
    assert!(result.is_err());
}
