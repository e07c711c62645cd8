//! Topology configuration management
//!
//! The configuration document is the single input to the builder: an ordered
//! list of domains, each with the subscriptions it wants to receive broadcasts
//! from. Documents are JSON (the canonical form) or YAML.

use crate::error::{Result, TopologyError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Main topology configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopologyConfig {
    /// Domains in declaration order; emission order follows this
    pub domains: Vec<Domain>,
}

/// A named unit of message ownership
///
/// Each domain gets exactly one broadcast topic and one inbound queue.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Domain {
    /// Unique identifier; all resource names derive from it
    pub name: String,
    /// Domains this domain wants to receive broadcasts from
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

/// A declared subscription to another domain's topic
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Subscription {
    /// Name of the source domain whose topic to subscribe to
    pub name: String,
    /// Attribute matcher handed to the delivery mechanism unmodified
    #[serde(default, rename = "filterPolicy")]
    pub filter_policy: Map<String, Value>,
}

impl TopologyConfig {
    /// Load configuration from a JSON or YAML file (dispatch on extension)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TopologyError::Config(format!("failed to read config file: {}", e)))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// Parse configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| TopologyError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|e| TopologyError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants of the document
    ///
    /// Domain names must be non-empty and unique; subscription names must be
    /// non-empty. Referential integrity between domains is the builder's job,
    /// not this one.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for domain in &self.domains {
            if domain.name.is_empty() {
                return Err(TopologyError::Config(
                    "domain with empty name".to_string(),
                ));
            }
            if !seen.insert(domain.name.as_str()) {
                return Err(TopologyError::DuplicateDomain(domain.name.clone()));
            }
            for sub in &domain.subscriptions {
                if sub.name.is_empty() {
                    return Err(TopologyError::Config(format!(
                        "domain {} has a subscription with an empty name",
                        domain.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Builder settings with explicit defaults
///
/// Replaces the process-wide environment lookups of earlier deployments with a
/// struct handed to the builder at construction time, so tests and tooling can
/// configure it without touching the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuilderSettings {
    /// Stack base name; export names are scoped under `{stack_name}{stack_suffix}`
    pub stack_name: String,

    /// Deployment environment suffix (`Dev`, `Stg`, `Prod`)
    pub stack_suffix: String,

    /// Deployment version surfaced as a stack output
    pub version: String,

    /// Delivery attempts before a message dead-letters
    pub max_receive_count: u32,

    /// Queue visibility timeout (seconds)
    pub visibility_timeout_secs: u64,

    /// Deliver raw message bodies instead of envelope-wrapped ones
    pub raw_message_delivery: bool,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            stack_name: "Topology".to_string(),
            stack_suffix: "Dev".to_string(),
            version: "0.0.0".to_string(),
            max_receive_count: crate::DEFAULT_MAX_RECEIVE_COUNT,
            visibility_timeout_secs: crate::DEFAULT_VISIBILITY_TIMEOUT_SECS,
            raw_message_delivery: true,
        }
    }
}

impl BuilderSettings {
    /// Fully-qualified stack identifier used to scope export names
    pub fn stack_id(&self) -> String {
        format!("{}{}", self.stack_name, self.stack_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = BuilderSettings::default();
        assert_eq!(settings.max_receive_count, 25);
        assert_eq!(settings.visibility_timeout_secs, 300);
        assert!(settings.raw_message_delivery);
        assert_eq!(settings.stack_id(), "TopologyDev");
    }

    #[test]
    fn test_subscriptions_default_empty() {
        let config =
            TopologyConfig::from_json(r#"{ "domains": [ { "name": "orders" } ] }"#).unwrap();
        assert!(config.domains[0].subscriptions.is_empty());
    }

    #[test]
    fn test_duplicate_domain_rejected() {
        let result = TopologyConfig::from_json(
            r#"{ "domains": [ { "name": "orders" }, { "name": "orders" } ] }"#,
        );
        assert!(matches!(result, Err(TopologyError::DuplicateDomain(name)) if name == "orders"));
    }
}
