use thiserror::Error;

/// Failures crossing the node boundary.
///
/// The two variants are kept distinct so the caller can tell a node-reported
/// error (which carries the upstream message unmodified) from a failure to
/// reach the node at all. Neither is retried here.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The node answered with an error object.
    #[error("node error: {0}")]
    Node(String),

    /// The node could not be reached, or its response was unreadable.
    #[error("transport error: {0}")]
    Transport(String),
}
