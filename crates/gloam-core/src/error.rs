use crate::node::NodeId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when constructing or mutating a world.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested node id is not declared in the story.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// Two nodes were declared with the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A node references an undeclared id.
    #[error("node {node}: {field} references undeclared node {target}")]
    UnknownReference {
        /// The node carrying the reference.
        node: NodeId,
        /// Which field held it (`requires`, `links`, `site`).
        field: &'static str,
        /// The unresolved target id.
        target: NodeId,
    },

    /// The declared start node is missing or not a room.
    #[error("start node {0} must be a declared room")]
    BadStart(NodeId),

    /// A movement target is not a room, sealed, or not reachable from here.
    #[error("cannot move to {target}: {reason}")]
    InvalidLocation {
        /// The rejected target id.
        target: NodeId,
        /// Why the move was rejected.
        reason: String,
    },

    /// A generic content validation error.
    #[error("validation error: {0}")]
    Validation(String),
}
