//! Topology error taxonomy
//!
//! Every failure here is a deterministic configuration defect: there is no
//! transient mode and nothing is retried. The first unresolved reference
//! aborts the whole build pass.

/// Topology-specific errors
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// A subscription names a domain whose topic was never built
    #[error("{0} topic not configured")]
    TopicNotFound(String),

    /// A subscribing domain has no built queue to deliver into
    #[error("{0} queue not configured")]
    QueueNotFound(String),

    /// Two domains share a name; resources would silently shadow each other
    #[error("duplicate domain name: {0}")]
    DuplicateDomain(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for topology operations
pub type Result<T> = std::result::Result<T, TopologyError>;
