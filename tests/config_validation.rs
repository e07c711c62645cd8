//! Configuration validation tests

use std::io::Write;
use topology_builder::{TopologyConfig, TopologyError};

#[test]
fn test_load_sample_config() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/topology.json");
    let config = TopologyConfig::from_file(path).unwrap();

    assert_eq!(config.domains.len(), 4);
    assert_eq!(config.domains[0].name, "Orders");
    assert!(config.domains[0].subscriptions.is_empty());

    // Shipping subscribes to Orders and Billing
    let shipping = &config.domains[2];
    assert_eq!(shipping.name, "Shipping");
    assert_eq!(shipping.subscriptions.len(), 2);
    assert_eq!(shipping.subscriptions[0].name, "Orders");
    assert_eq!(shipping.subscriptions[1].name, "Billing");
}

#[test]
fn test_load_yaml_config() {
    let yaml = r#"
domains:
  - name: orders
  - name: billing
    subscriptions:
      - name: orders
        filterPolicy:
          eventType: ["paid"]
"#;
    let config = TopologyConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.domains.len(), 2);
    assert_eq!(config.domains[1].subscriptions.len(), 1);
    assert_eq!(config.domains[1].subscriptions[0].name, "orders");
}

#[test]
fn test_filter_policy_preserved_on_parse() {
    let config = TopologyConfig::from_json(
        r#"{ "domains": [ { "name": "billing", "subscriptions": [
            { "name": "orders", "filterPolicy": { "eventType": ["created"] } }
        ] } ] }"#,
    )
    .unwrap();

    let policy = &config.domains[0].subscriptions[0].filter_policy;
    assert_eq!(
        serde_json::to_value(policy).unwrap(),
        serde_json::json!({ "eventType": ["created"] })
    );
}

#[test]
fn test_missing_domain_name_is_fatal() {
    let result = TopologyConfig::from_json(r#"{ "domains": [ { "subscriptions": [] } ] }"#);
    assert!(matches!(result, Err(TopologyError::Config(_))));
}

#[test]
fn test_missing_domains_field_is_fatal() {
    let result = TopologyConfig::from_json(r#"{}"#);
    assert!(matches!(result, Err(TopologyError::Config(_))));
}

#[test]
fn test_empty_names_are_fatal() {
    let result = TopologyConfig::from_json(r#"{ "domains": [ { "name": "" } ] }"#);
    assert!(matches!(result, Err(TopologyError::Config(_))));

    let result = TopologyConfig::from_json(
        r#"{ "domains": [ { "name": "orders", "subscriptions": [ { "name": "" } ] } ] }"#,
    );
    assert!(matches!(result, Err(TopologyError::Config(_))));
}

#[test]
fn test_duplicate_domain_name_is_fatal() {
    let result = TopologyConfig::from_json(
        r#"{ "domains": [ { "name": "orders" }, { "name": "billing" }, { "name": "orders" } ] }"#,
    );
    assert!(matches!(result, Err(TopologyError::DuplicateDomain(name)) if name == "orders"));
}

#[test]
fn test_from_file_dispatches_on_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("topology.yaml");
    let mut file = std::fs::File::create(&yaml_path).unwrap();
    writeln!(file, "domains:\n  - name: orders").unwrap();
    let config = TopologyConfig::from_file(&yaml_path).unwrap();
    assert_eq!(config.domains[0].name, "orders");

    let json_path = dir.path().join("topology.json");
    let mut file = std::fs::File::create(&json_path).unwrap();
    writeln!(file, r#"{{ "domains": [ {{ "name": "orders" }} ] }}"#).unwrap();
    let config = TopologyConfig::from_file(&json_path).unwrap();
    assert_eq!(config.domains[0].name, "orders");
}

#[test]
fn test_missing_file_is_config_error() {
    let result = TopologyConfig::from_file("config/does_not_exist.json");
    assert!(matches!(result, Err(TopologyError::Config(_))));
}
