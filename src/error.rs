//! Error types for the binding layer.

use thiserror::Error;

use crate::element::{ElementId, NotifyError};
use crate::types::ElementKind;
use crate::visual::NodeId;

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, BindError>;

/// Errors raised while building, syncing or destroying native nodes.
#[derive(Error, Debug)]
pub enum BindError {
    /// No builder function is registered for an element kind.
    #[error("no builder registered for element kind `{kind}`")]
    UnregisteredType { kind: ElementKind },

    /// The element was never built, or was already destroyed.
    #[error("element {id} has no registered native node")]
    UnregisteredElement { id: ElementId },

    /// The element already has a native node.
    #[error("element {id} is already registered")]
    AlreadyRegistered { id: ElementId },

    /// The native node does not exist (released or never created).
    #[error("unknown native node {node}")]
    UnknownNode { node: NodeId },

    /// The layout engine rejected the tree.
    #[error("layout failed: {0}")]
    Layout(String),

    /// A change listener failed while a mutation was being dispatched.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Settings could not be parsed.
    #[error("invalid layout settings: {0}")]
    Config(#[from] toml::de::Error),

    /// Settings file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
