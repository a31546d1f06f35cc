//! Slot-map backed markup document
//!
//! Nodes live in a [`SlotMap`] and are addressed by [`NodeId`]. Replacing a
//! node's content removes the old subtree from the map, so a handle to a
//! removed node is stale and every operation on it fails with
//! [`DomError::UnknownNode`].

use crate::error::{DomError, DomResult};
use crate::node::{is_raw_text, is_void, Attribute, NodeData, NodeId, NodeKind, NodeType};
use crate::parser::{parse_fragment, Parsed};
use crate::selector::Selector;
use crate::tree::MarkupTree;
use slotmap::SlotMap;

#[derive(Debug, Clone)]
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with just a root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(NodeKind::Document));
        Self { nodes, root }
    }

    /// Parse a markup string into a new document
    pub fn parse(markup: &str) -> DomResult<Self> {
        let mut doc = Self::new();
        let root = doc.root();
        for parsed in parse_fragment(markup)? {
            let child = doc.materialize(parsed);
            doc.attach(root, child);
        }
        Ok(doc)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, the root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the handle still refers to a node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    fn data(&self, id: NodeId) -> DomResult<&NodeData> {
        self.nodes.get(id).ok_or(DomError::UnknownNode(id))
    }

    fn data_mut(&mut self, id: NodeId) -> DomResult<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(DomError::UnknownNode(id))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.insert(NodeData::new(kind))
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Comment(text.to_string()))
    }

    /// Append `child` to `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if !self.can_hold_children(parent)? {
            return Err(DomError::NotAnElement(parent));
        }
        self.data(child)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DomError::Hierarchy { parent, child });
        }
        self.detach(child);
        self.attach(parent, child);
        Ok(())
    }

    /// Detach the node and drop it together with its descendants. The root
    /// cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        self.data(id)?;
        if id == self.root {
            return Err(DomError::RootRemoval);
        }
        self.detach(id);
        self.drop_subtree(id);
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child].parent.take() {
            self.nodes[parent].children.retain(|&c| c != child);
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    fn is_ancestor(&self, candidate: NodeId, mut node: NodeId) -> bool {
        while let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) {
            if parent == candidate {
                return true;
            }
            node = parent;
        }
        false
    }

    fn can_hold_children(&self, id: NodeId) -> DomResult<bool> {
        Ok(matches!(
            self.data(id)?.kind,
            NodeKind::Document | NodeKind::Element { .. }
        ))
    }

    fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.drop_subtree(child);
        }
    }

    fn materialize(&mut self, parsed: Parsed) -> NodeId {
        match parsed {
            Parsed::Text(text) => self.push(NodeKind::Text(text)),
            Parsed::Comment(text) => self.push(NodeKind::Comment(text)),
            Parsed::Element {
                tag,
                attributes,
                children,
            } => {
                let id = self.push(NodeKind::Element { tag, attributes });
                for child in children {
                    let child = self.materialize(child);
                    self.attach(id, child);
                }
                id
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        match &mut self.data_mut(id)?.kind {
            NodeKind::Element { attributes, .. } => {
                match attributes.iter_mut().find(|a| a.name == name) {
                    Some(existing) => existing.value = value.to_string(),
                    None => attributes.push(Attribute::new(name, value)),
                }
                Ok(())
            }
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Comment(_) => {}
            NodeKind::Document | NodeKind::Element { .. } => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// All matching elements in document order
    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        let mut found = Vec::new();
        self.walk(self.root(), &mut |id, data| {
            if let NodeKind::Element { tag, attributes } = &data.kind {
                if selector.matches(tag, attributes) {
                    found.push(id);
                }
            }
        });
        Ok(found)
    }

    fn walk(&self, id: NodeId, visit: &mut dyn FnMut(NodeId, &NodeData)) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        visit(id, node);
        for &child in &node.children {
            self.walk(child, visit);
        }
    }

    /// Serialized children of the node
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self.tag_name(id).is_some_and(is_raw_text);
        for &child in self.children(id) {
            self.write_node(child, raw, &mut out);
        }
        out
    }

    /// Serialized node including its own tag
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, false, &mut out);
        out
    }

    /// Serialized document
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Document => {
                for &child in &node.children {
                    self.write_node(child, false, out);
                }
            }
            NodeKind::Text(text) if raw_text => out.push_str(text),
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for attr in attributes {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if !attr.value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_attribute(&attr.value));
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void(tag) {
                    return;
                }
                let raw = is_raw_text(tag);
                for &child in &node.children {
                    self.write_node(child, raw, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

impl MarkupTree for Document {
    type Node = NodeId;

    fn query_selector(&self, selector: &str) -> DomResult<NodeId> {
        self.query_selector_all(selector)?
            .first()
            .copied()
            .ok_or_else(|| DomError::SelectorNotFound(selector.to_string()))
    }

    fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node).to_vec()
    }

    fn node_type(&self, node: NodeId) -> Option<NodeType> {
        self.nodes.get(node).map(|n| n.kind.node_type())
    }

    fn attributes(&self, node: NodeId) -> Vec<Attribute> {
        match self.nodes.get(node).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes.clone(),
            _ => Vec::new(),
        }
    }

    fn text(&self, node: NodeId) -> Option<String> {
        match &self.nodes.get(node)?.kind {
            NodeKind::Text(text) | NodeKind::Comment(text) => Some(text.clone()),
            _ => None,
        }
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        match &mut self.data_mut(node)?.kind {
            NodeKind::Text(data) | NodeKind::Comment(data) => {
                *data = text.to_string();
                return Ok(());
            }
            NodeKind::Document | NodeKind::Element { .. } => {}
        }

        self.clear_children(node);
        if !text.is_empty() {
            let child = self.create_text(text);
            self.attach(node, child);
        }
        Ok(())
    }

    fn set_inner_html(&mut self, node: NodeId, markup: &str) -> DomResult<()> {
        if !self.can_hold_children(node)? {
            return Err(DomError::NotAnElement(node));
        }
        let parsed = parse_fragment(markup)?;

        self.clear_children(node);
        for item in parsed {
            let child = self.materialize(item);
            self.attach(node, child);
        }
        tracing::trace!(%node, "inner html replaced");
        Ok(())
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
