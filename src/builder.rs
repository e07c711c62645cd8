//! Topology wiring pass
//!
//! Three phases, run strictly in order over one immutable configuration:
//! resources (topics, queues, dead-letter queues), access policies, then
//! subscriptions. Later phases resolve names against the resources built in
//! phase one through name-keyed maps, so "not found" is an explicit branch
//! rather than an index comparison.
//!
//! The pass is single-threaded by design: the configuration is small and fully
//! known up front, and phases two and three require phase one to have fully
//! completed. Any unresolved reference aborts the whole pass; partial topology
//! is worse than refusing to build.

use crate::config::{BuilderSettings, TopologyConfig};
use crate::declarations::{
    dead_letter_queue_id, queue_id, queue_policy_id, subscription_id, topic_id, AttrRef,
    DeadLetterQueueDeclaration, Effect, OutputDeclaration, OutputValue, PolicyStatement, Protocol,
    QueueDeclaration, QueuePolicyDeclaration, RedrivePolicy, SubscriptionDeclaration, Topology,
    TopicDeclaration, SEND_MESSAGE_ACTION,
};
use crate::error::{Result, TopologyError};
use indexmap::IndexMap;
use tracing::{debug, info};

/// Per-domain resources built in phase one, keyed by domain name
///
/// Insertion order follows the configuration document, which keeps the
/// flattened declaration lists diffable across runs.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    pub topics: IndexMap<String, TopicDeclaration>,
    pub queues: IndexMap<String, QueueDeclaration>,
    pub dead_letter_queues: IndexMap<String, DeadLetterQueueDeclaration>,
}

/// Builds the full declaration set from a topology configuration
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    settings: BuilderSettings,
}

impl TopologyBuilder {
    pub fn new(settings: BuilderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BuilderSettings {
        &self.settings
    }

    /// Phase 1: one topic and one queue (with its dead-letter queue) per domain
    ///
    /// Performs no subscription validation; naming is derived solely from the
    /// domain name so re-running against an unchanged configuration produces
    /// identical declarations.
    pub fn build_resources(&self, config: &TopologyConfig) -> Resources {
        let mut resources = Resources::default();

        for domain in &config.domains {
            let topic = TopicDeclaration {
                logical_id: topic_id(&domain.name),
                domain: domain.name.clone(),
            };
            debug!("declared topic {}", topic.logical_id);
            resources.topics.insert(domain.name.clone(), topic);

            let dlq = DeadLetterQueueDeclaration {
                logical_id: dead_letter_queue_id(&domain.name),
                domain: domain.name.clone(),
            };
            let queue = QueueDeclaration {
                logical_id: queue_id(&domain.name),
                domain: domain.name.clone(),
                visibility_timeout_secs: self.settings.visibility_timeout_secs,
                redrive: RedrivePolicy {
                    dead_letter_queue: dlq.logical_id.clone(),
                    max_receive_count: self.settings.max_receive_count,
                },
            };
            debug!("declared queue {} (dlq {})", queue.logical_id, dlq.logical_id);
            resources.dead_letter_queues.insert(domain.name.clone(), dlq);
            resources.queues.insert(domain.name.clone(), queue);
        }

        info!(
            "built {} topics and {} queues",
            resources.topics.len(),
            resources.queues.len()
        );
        resources
    }

    /// Phase 2: one access policy per domain with at least one subscription
    ///
    /// Exactly one statement per subscription, scoped to the subscription's
    /// source topic and nothing else. Domains without subscriptions emit no
    /// policy at all. Lookups are exact and case-sensitive; a dangling
    /// reference aborts the pass.
    pub fn build_access_policies(
        &self,
        config: &TopologyConfig,
        resources: &Resources,
    ) -> Result<Vec<QueuePolicyDeclaration>> {
        let mut policies = Vec::new();

        for domain in &config.domains {
            if domain.subscriptions.is_empty() {
                continue;
            }

            let queue = resources
                .queues
                .get(&domain.name)
                .ok_or_else(|| TopologyError::QueueNotFound(domain.name.clone()))?;

            let mut statements = Vec::with_capacity(domain.subscriptions.len());
            for sub in &domain.subscriptions {
                let topic = resources
                    .topics
                    .get(&sub.name)
                    .ok_or_else(|| TopologyError::TopicNotFound(sub.name.clone()))?;
                statements.push(PolicyStatement {
                    effect: Effect::Allow,
                    principal: "*".to_string(),
                    action: SEND_MESSAGE_ACTION.to_string(),
                    resource: AttrRef::arn(&queue.logical_id),
                    source_topic: AttrRef::arn(&topic.logical_id),
                });
            }

            debug!(
                "declared policy {} with {} statements",
                queue_policy_id(&domain.name),
                statements.len()
            );
            policies.push(QueuePolicyDeclaration {
                logical_id: queue_policy_id(&domain.name),
                queue: AttrRef::url(&queue.logical_id),
                statements,
            });
        }

        info!("built {} queue policies", policies.len());
        Ok(policies)
    }

    /// Phase 3: one delivery declaration per validated subscription
    ///
    /// Resolves the source topic by the subscription's name and the
    /// destination queue by the owning domain's name. Halts on the first
    /// unresolved reference, reporting the offending name; remaining
    /// subscriptions are not processed.
    pub fn build_subscriptions(
        &self,
        config: &TopologyConfig,
        resources: &Resources,
    ) -> Result<Vec<SubscriptionDeclaration>> {
        let mut subscriptions = Vec::new();

        for domain in &config.domains {
            for sub in &domain.subscriptions {
                let topic = resources
                    .topics
                    .get(&sub.name)
                    .ok_or_else(|| TopologyError::TopicNotFound(sub.name.clone()))?;
                let queue = resources
                    .queues
                    .get(&domain.name)
                    .ok_or_else(|| TopologyError::QueueNotFound(domain.name.clone()))?;

                debug!(
                    "declared subscription {} -> {}",
                    topic.logical_id, queue.logical_id
                );
                subscriptions.push(SubscriptionDeclaration {
                    logical_id: subscription_id(&domain.name, &sub.name),
                    topic: AttrRef::arn(&topic.logical_id),
                    endpoint: AttrRef::arn(&queue.logical_id),
                    protocol: Protocol::Sqs,
                    raw_message_delivery: self.settings.raw_message_delivery,
                    filter_policy: sub.filter_policy.clone(),
                });
            }
        }

        info!("built {} subscriptions", subscriptions.len());
        Ok(subscriptions)
    }

    /// Per-domain exports (topic ARN, queue ARN, queue URL) plus the
    /// deployment version, scoped under the stack id
    pub fn build_outputs(&self, resources: &Resources) -> Vec<OutputDeclaration> {
        let stack_id = self.settings.stack_id();
        let mut outputs = Vec::new();

        for (name, topic) in &resources.topics {
            outputs.push(OutputDeclaration {
                name: format!("tpcArn{}", name),
                export_name: format!("{}:tpcArn{}", stack_id, name),
                value: OutputValue::Attribute(AttrRef::arn(&topic.logical_id)),
            });
        }
        for (name, queue) in &resources.queues {
            outputs.push(OutputDeclaration {
                name: format!("mqArn{}", name),
                export_name: format!("{}:mqArn{}", stack_id, name),
                value: OutputValue::Attribute(AttrRef::arn(&queue.logical_id)),
            });
            outputs.push(OutputDeclaration {
                name: format!("mqUrl{}", name),
                export_name: format!("{}:mqUrl{}", stack_id, name),
                value: OutputValue::Attribute(AttrRef::url(&queue.logical_id)),
            });
        }
        outputs.push(OutputDeclaration {
            name: "version".to_string(),
            export_name: format!("{}:version", stack_id),
            value: OutputValue::Literal(self.settings.version.clone()),
        });

        outputs
    }

    /// Run all phases in order and assemble the declaration set
    ///
    /// Any phase error aborts the whole pass; no partial set is returned.
    pub fn build(&self, config: &TopologyConfig) -> Result<Topology> {
        config.validate()?;

        let resources = self.build_resources(config);
        let policies = self.build_access_policies(config, &resources)?;
        let subscriptions = self.build_subscriptions(config, &resources)?;
        let outputs = self.build_outputs(&resources);

        Ok(Topology {
            topics: resources.topics.into_values().collect(),
            queues: resources.queues.into_values().collect(),
            dead_letter_queues: resources.dead_letter_queues.into_values().collect(),
            policies,
            subscriptions,
            outputs,
        })
    }
}
