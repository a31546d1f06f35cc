//! The host interface consumed by the template compiler

use crate::error::DomResult;
use crate::node::{Attribute, NodeType};
use std::fmt::Debug;

/// Narrow view of a structured markup tree.
///
/// The compiler only needs to locate a root, walk children, read attributes
/// and text, and paint new content. Any host that can do that can be bound.
pub trait MarkupTree {
    /// Node handle. Handles stay valid while the node is in the tree.
    type Node: Copy + Debug + 'static;

    /// First node matching `selector`, in document order
    fn query_selector(&self, selector: &str) -> DomResult<Self::Node>;

    /// Snapshot of a node's children
    fn child_nodes(&self, node: Self::Node) -> Vec<Self::Node>;

    fn node_type(&self, node: Self::Node) -> Option<NodeType>;

    fn attributes(&self, node: Self::Node) -> Vec<Attribute>;

    /// Character data of a text or comment node
    fn text(&self, node: Self::Node) -> Option<String>;

    /// Replace the node's text. On elements this replaces all children.
    fn set_text_content(&mut self, node: Self::Node, text: &str) -> DomResult<()>;

    /// Parse `markup` and replace the element's children with the result
    fn set_inner_html(&mut self, node: Self::Node, markup: &str) -> DomResult<()>;
}
