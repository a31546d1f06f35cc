//! Directive compiler
//!
//! Walks the descendants of a root node depth-first, pre-order:
//!
//! - element nodes: every attribute named `<prefix><directive>` whose
//!   directive is in the [`DirectiveTable`] becomes a binding
//! - text nodes containing `{{ path }}`: an implicit `text` binding
//! - anything else: skipped
//!
//! Each binding paints once immediately, then owns exactly one
//! [`Subscriber`] whose update repaints the node. Content painted by a
//! binding is data, never template: an element that carries a binding is
//! not descended into, so painted text or markup is never compiled.

use crate::directive::{Directive, DirectiveTable};
use crate::error::{BindError, BindResult};
use crate::facade::Facade;
use bindery_dom::{MarkupTree, NodeType};
use bindery_reactive::{KeyPath, ReactiveError, Subscriber, Value};
use regex::Regex;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

/// A live binding between a node and a data path
#[derive(Debug)]
pub struct Binding<N> {
    node: N,
    path: KeyPath,
    directive: Directive,
    subscriber: Subscriber,
}

impl<N: Copy> Binding<N> {
    pub fn node(&self) -> N {
        self.node
    }

    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    pub fn directive(&self) -> Directive {
        self.directive
    }

    pub fn subscriber(&self) -> &Subscriber {
        &self.subscriber
    }
}

/// Path inside the first `{{ ... }}` placeholder, if the text has one
pub fn interpolation(text: &str) -> Option<&str> {
    interpolation_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn interpolation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_$][\w$]*(?:\.[\w$]+)*)\s*\}\}")
            .expect("valid interpolation regex")
    })
}

/// Paint a value into a node with the directive's primitive
pub fn paint<T: MarkupTree>(
    tree: &RefCell<T>,
    node: T::Node,
    directive: Directive,
    value: &Value,
) -> BindResult<()> {
    let mut tree = tree.try_borrow_mut().map_err(|_| BindError::TreeBusy)?;
    let rendered = value.to_string();
    match directive {
        Directive::Text => tree.set_text_content(node, &rendered)?,
        Directive::Html => tree.set_inner_html(node, &rendered)?,
    }
    Ok(())
}

pub struct Compiler<'a, T: MarkupTree> {
    tree: Rc<RefCell<T>>,
    facade: &'a Facade,
    directives: &'a DirectiveTable,
    prefix: &'a str,
}

impl<'a, T: MarkupTree + 'static> Compiler<'a, T> {
    pub fn new(
        tree: Rc<RefCell<T>>,
        facade: &'a Facade,
        directives: &'a DirectiveTable,
        prefix: &'a str,
    ) -> Self {
        Self {
            tree,
            facade,
            directives,
            prefix,
        }
    }

    /// Compile every descendant of `root` and return the installed bindings
    pub fn compile(&self, root: T::Node) -> BindResult<Vec<Binding<T::Node>>> {
        let mut bindings = Vec::new();
        self.compile_children(root, &mut bindings)?;
        tracing::debug!(?root, bindings = bindings.len(), "compiled");
        Ok(bindings)
    }

    fn compile_children(
        &self,
        parent: T::Node,
        bindings: &mut Vec<Binding<T::Node>>,
    ) -> BindResult<()> {
        let children = self.tree.borrow().child_nodes(parent);

        for node in children {
            let node_type = self.tree.borrow().node_type(node);
            match node_type {
                Some(NodeType::Element) => {
                    if !self.compile_element(node, bindings)? {
                        self.compile_children(node, bindings)?;
                    }
                }
                Some(NodeType::Text) => {
                    let text = self.tree.borrow().text(node).unwrap_or_default();
                    if let Some(path) = interpolation(&text) {
                        let path = KeyPath::parse(path)?;
                        bindings.push(self.update(node, path, Directive::Text)?);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Install the element's directive bindings. Returns whether any were
    /// installed, in which case the element's content belongs to them.
    fn compile_element(
        &self,
        node: T::Node,
        bindings: &mut Vec<Binding<T::Node>>,
    ) -> BindResult<bool> {
        let attributes = self.tree.borrow().attributes(node);
        let mut bound = false;

        for attr in attributes {
            let Some(name) = attr.name.strip_prefix(self.prefix) else {
                continue;
            };
            match self.directives.lookup(name) {
                Some(directive) => {
                    let path = KeyPath::parse(&attr.value)?;
                    bindings.push(self.update(node, path, directive)?);
                    bound = true;
                }
                None => tracing::trace!(directive = name, "no handler, ignoring"),
            }
        }
        Ok(bound)
    }

    /// Paint the current value, then subscribe a repaint to the path
    fn update(
        &self,
        node: T::Node,
        path: KeyPath,
        directive: Directive,
    ) -> BindResult<Binding<T::Node>> {
        let value = self.facade.read_path(&path)?;
        paint(&self.tree, node, directive, &value)?;

        let tree = Rc::clone(&self.tree);
        let subscriber = Subscriber::new(self.facade.data(), path.clone(), move |value: &Value| {
            paint(&tree, node, directive, value)
                .map_err(|e| ReactiveError::Callback(e.to_string()))
        })?;

        tracing::debug!(?node, %path, %directive, "binding installed");
        Ok(Binding {
            node,
            path,
            directive,
            subscriber,
        })
    }
}
