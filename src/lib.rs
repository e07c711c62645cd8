//! Declarative Messaging Topology Builder
//!
//! Separates logical message ownership (domains) from physical delivery wiring
//! (topics, queues, access policies, subscriptions) so a convergence engine can
//! realize the topology without any imperative ordering logic here.
//!
//! Each domain owns one broadcast topic and one inbound queue (with an
//! exclusively-owned dead-letter queue). Cross-domain delivery is declared as
//! subscriptions in the configuration document; the builder validates
//! referential integrity and emits the minimum access policy each subscribing
//! queue needs.

pub mod builder;
pub mod config;
pub mod declarations;
pub mod error;

// Re-export main types
pub use builder::{Resources, TopologyBuilder};
pub use config::{BuilderSettings, Domain, Subscription, TopologyConfig};
pub use declarations::{
    Attr, AttrRef, DeadLetterQueueDeclaration, Effect, OutputDeclaration, OutputValue,
    PolicyStatement, Protocol, QueueDeclaration, QueuePolicyDeclaration, RedrivePolicy,
    SubscriptionDeclaration, Topology, TopicDeclaration,
};
pub use error::{Result, TopologyError};

/// Current version of the topology configuration format
pub const TOPOLOGY_VERSION: &str = "1.0.0";

/// Delivery attempts before a message is moved to the dead-letter queue
pub const DEFAULT_MAX_RECEIVE_COUNT: u32 = 25;

/// Queue visibility timeout in seconds
pub const DEFAULT_VISIBILITY_TIMEOUT_SECS: u64 = 300;
