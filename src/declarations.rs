//! Declaration model emitted by the builder
//!
//! Declarations are inert descriptions handed to an external convergence
//! engine; nothing here talks to a provider. Serialization is camelCase and
//! field order is fixed so generated output stays diffable across runs.
//!
//! Attribute values (queue ARNs/URLs, topic ARNs) only exist after
//! provisioning, so declarations reference them through [`AttrRef`] by the
//! owning resource's logical id.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Permission action for delivering into a queue
pub const SEND_MESSAGE_ACTION: &str = "SQS:SendMessage";

/// Logical id of a domain's broadcast topic
pub fn topic_id(domain: &str) -> String {
    format!("tpc{}", domain)
}

/// Logical id of a domain's message queue
pub fn queue_id(domain: &str) -> String {
    format!("mq{}", domain)
}

/// Logical id of a queue's dead-letter queue
pub fn dead_letter_queue_id(domain: &str) -> String {
    format!("dlq{}", domain)
}

/// Logical id of a queue's access policy
pub fn queue_policy_id(domain: &str) -> String {
    format!("mqPol{}", domain)
}

/// Logical id of a subscription from `domain`'s queue to `source`'s topic
pub fn subscription_id(domain: &str, source: &str) -> String {
    format!("tpcSub{}To{}", domain, source)
}

/// Resource attribute resolved by the convergence engine after provisioning
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Attr {
    Arn,
    Url,
}

/// Reference to an attribute of a declared resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttrRef {
    /// Logical id of the referenced resource
    pub resource: String,
    pub attribute: Attr,
}

impl AttrRef {
    pub fn arn(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            attribute: Attr::Arn,
        }
    }

    pub fn url(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            attribute: Attr::Url,
        }
    }
}

/// Broadcast topic, one per domain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDeclaration {
    pub logical_id: String,
    pub domain: String,
}

/// Dead-letter queue, owned exclusively by a domain's message queue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetterQueueDeclaration {
    pub logical_id: String,
    pub domain: String,
}

/// Redrive policy binding a queue to its dead-letter queue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedrivePolicy {
    /// Logical id of the dead-letter queue
    pub dead_letter_queue: String,
    pub max_receive_count: u32,
}

/// Message queue, one per domain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueDeclaration {
    pub logical_id: String,
    pub domain: String,
    pub visibility_timeout_secs: u64,
    pub redrive: RedrivePolicy,
}

/// Effect of a policy statement
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Single permission entry: lets one topic deliver into one queue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStatement {
    pub effect: Effect,
    pub principal: String,
    pub action: String,
    /// The queue being delivered into
    pub resource: AttrRef,
    /// The only topic allowed to deliver
    pub source_topic: AttrRef,
}

/// Access policy attached to a domain's queue
///
/// Emitted only for domains with at least one subscription; carries exactly
/// one statement per subscription.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuePolicyDeclaration {
    pub logical_id: String,
    pub queue: AttrRef,
    pub statements: Vec<PolicyStatement>,
}

/// Delivery protocol for a subscription endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Sqs,
}

/// Topic-to-queue delivery declaration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDeclaration {
    pub logical_id: String,
    /// Source topic ARN
    pub topic: AttrRef,
    /// Destination queue ARN
    pub endpoint: AttrRef,
    pub protocol: Protocol,
    pub raw_message_delivery: bool,
    /// Passed through from the configuration unmodified
    pub filter_policy: Map<String, Value>,
}

/// Value of a stack output
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputValue {
    Attribute(AttrRef),
    Literal(String),
}

/// Exported stack output consumed by sibling stacks
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDeclaration {
    pub name: String,
    /// Scoped as `{stack_id}:{name}`
    pub export_name: String,
    pub value: OutputValue,
}

/// Complete declaration set for one deployment pass
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    pub topics: Vec<TopicDeclaration>,
    pub queues: Vec<QueueDeclaration>,
    pub dead_letter_queues: Vec<DeadLetterQueueDeclaration>,
    pub policies: Vec<QueuePolicyDeclaration>,
    pub subscriptions: Vec<SubscriptionDeclaration>,
    pub outputs: Vec<OutputDeclaration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_id_derivation() {
        assert_eq!(topic_id("Orders"), "tpcOrders");
        assert_eq!(queue_id("Orders"), "mqOrders");
        assert_eq!(dead_letter_queue_id("Orders"), "dlqOrders");
        assert_eq!(queue_policy_id("Orders"), "mqPolOrders");
        assert_eq!(subscription_id("Billing", "Orders"), "tpcSubBillingToOrders");
    }

    #[test]
    fn test_attr_ref_serialization() {
        let json = serde_json::to_value(AttrRef::arn("tpcOrders")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "resource": "tpcOrders", "attribute": "arn" })
        );
    }
}
