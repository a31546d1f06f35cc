//! Error types for markup tree operations

use crate::node::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("No node matches selector `{0}`")]
    SelectorNotFound(String),

    #[error("Invalid selector `{0}`")]
    InvalidSelector(String),

    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Node {0} cannot hold children")]
    NotAnElement(NodeId),

    #[error("Cannot append {child} under {parent}")]
    Hierarchy { parent: NodeId, child: NodeId },

    #[error("The document root cannot be removed")]
    RootRemoval,

    #[error("Markup parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
}

pub type DomResult<T> = Result<T, DomError>;
