//! Root instance
//!
//! Mounting observes the data, installs the facade over its top-level keys,
//! locates the root node and compiles everything beneath it. The instance
//! owns the resulting bindings; unmounting (or dropping) the instance
//! disposes their subscribers.

use crate::compiler::{Binding, Compiler};
use crate::config::BinderConfig;
use crate::directive::DirectiveTable;
use crate::error::{BindError, BindResult};
use crate::facade::Facade;
use bindery_dom::MarkupTree;
use bindery_reactive::{scoped_max_notify_depth, Record, Value};
use std::cell::RefCell;
use std::rc::Rc;

pub struct Instance<T: MarkupTree + 'static> {
    config: BinderConfig,
    facade: Facade,
    tree: Rc<RefCell<T>>,
    root: T::Node,
    bindings: Vec<Binding<T::Node>>,
    mounted: bool,
}

impl<T: MarkupTree + 'static> Instance<T> {
    /// Mount with the default directive catalog
    pub fn mount(
        tree: Rc<RefCell<T>>,
        data: serde_json::Value,
        config: &BinderConfig,
    ) -> BindResult<Self> {
        Self::mount_with(tree, data, config, &DirectiveTable::default())
    }

    /// Mount with a custom directive catalog
    pub fn mount_with(
        tree: Rc<RefCell<T>>,
        data: serde_json::Value,
        config: &BinderConfig,
        directives: &DirectiveTable,
    ) -> BindResult<Self> {
        config.validate()?;

        let data = match Value::from(data) {
            Value::Record(record) => record,
            other => return Err(BindError::DataNotRecord(other.type_name())),
        };
        let facade = Facade::install(&data);

        let root = tree.borrow().query_selector(&config.selector)?;
        let bindings = Compiler::new(
            Rc::clone(&tree),
            &facade,
            directives,
            &config.directive_prefix,
        )
        .compile(root)?;

        tracing::debug!(
            selector = %config.selector,
            keys = facade.keys().len(),
            bindings = bindings.len(),
            "mounted"
        );

        Ok(Self {
            config: config.clone(),
            facade,
            tree,
            root,
            bindings,
            mounted: true,
        })
    }

    /// Read a top-level key through the facade
    pub fn get(&self, key: &str) -> BindResult<Value> {
        self.facade.get(key)
    }

    /// Write a top-level key through the facade; bound nodes repaint before
    /// this returns. Nested notifications are bounded by this instance's
    /// `max_notify_depth`.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> BindResult<()> {
        let _limit = scoped_max_notify_depth(self.config.max_notify_depth);
        self.facade.set(key, value)
    }

    pub fn facade(&self) -> &Facade {
        &self.facade
    }

    pub fn data(&self) -> &Record {
        self.facade.data()
    }

    /// The markup tree the instance is mounted on
    pub fn document(&self) -> &Rc<RefCell<T>> {
        &self.tree
    }

    pub fn root(&self) -> T::Node {
        self.root
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    pub fn bindings(&self) -> &[Binding<T::Node>] {
        &self.bindings
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Dispose every binding. Data stays readable and writable but nothing
    /// repaints any more.
    pub fn unmount(&mut self) {
        let count = self.bindings.len();
        for binding in self.bindings.drain(..) {
            binding.subscriber().dispose();
        }
        self.mounted = false;
        tracing::debug!(bindings = count, "unmounted");
    }
}

impl<T: MarkupTree + 'static> std::fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("selector", &self.config.selector)
            .field("root", &self.root)
            .field("keys", &self.facade.keys())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_dom::Document;
    use serde_json::json;

    fn document(markup: &str) -> Rc<RefCell<Document>> {
        Rc::new(RefCell::new(Document::parse(markup).unwrap()))
    }

    #[test]
    fn test_mount_paints_and_updates() {
        let doc = document(r#"<div id="app"><p>{{counter}}</p></div>"#);
        let config = BinderConfig::default();
        let vm = Instance::mount(Rc::clone(&doc), json!({"counter": 1}), &config).unwrap();

        assert_eq!(doc.borrow().to_html(), r#"<div id="app"><p>1</p></div>"#);

        vm.set("counter", 5).unwrap();
        assert_eq!(doc.borrow().to_html(), r#"<div id="app"><p>5</p></div>"#);
        assert_eq!(vm.get("counter").unwrap(), Value::from(5));
    }

    #[test]
    fn test_rejects_non_record_data() {
        let doc = document(r#"<div id="app"></div>"#);
        let result = Instance::mount(doc, json!([1, 2]), &BinderConfig::default());
        // Arrays are records keyed by index, so they mount
        assert!(result.is_ok());

        let doc = document(r#"<div id="app"></div>"#);
        let result = Instance::mount(doc, json!("text"), &BinderConfig::default());
        assert!(matches!(result, Err(BindError::DataNotRecord("string"))));
    }

    #[test]
    fn test_missing_root_is_a_lookup_error() {
        let doc = document("<main></main>");
        let result = Instance::mount(doc, json!({}), &BinderConfig::default());

        assert!(matches!(
            result,
            Err(BindError::Dom(bindery_dom::DomError::SelectorNotFound(_)))
        ));
    }

    #[test]
    fn test_only_descendants_of_root_are_compiled() {
        let doc = document(r#"<p>{{a}}</p><section class="root"><p>{{a}}</p></section>"#);
        let config = BinderConfig::default().with_selector("section.root");
        let vm = Instance::mount(Rc::clone(&doc), json!({"a": "x"}), &config).unwrap();

        assert_eq!(vm.bindings().len(), 1);
        assert_eq!(
            doc.borrow().to_html(),
            r#"<p>{{a}}</p><section class="root"><p>x</p></section>"#
        );
    }

    #[test]
    fn test_unmount_stops_repainting() {
        let doc = document(r#"<div id="app"><p>{{counter}}</p></div>"#);
        let config = BinderConfig::default();
        let mut vm = Instance::mount(Rc::clone(&doc), json!({"counter": 1}), &config).unwrap();

        vm.unmount();
        assert!(!vm.is_mounted());
        assert_eq!(vm.data().subscriber_count("counter"), 0);

        vm.set("counter", 9).unwrap();
        assert_eq!(doc.borrow().to_html(), r#"<div id="app"><p>1</p></div>"#);
        assert_eq!(vm.get("counter").unwrap(), Value::from(9));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let doc = document(r#"<div id="app"></div>"#);
        let config = BinderConfig::default().with_directive_prefix("");
        let result = Instance::mount(doc, json!({}), &config);

        assert!(matches!(result, Err(BindError::Config(_))));
    }
}
