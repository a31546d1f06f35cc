//! # bindery-core
//!
//! Template binding for bindery.
//!
//! This crate ties the reactive records from `bindery-reactive` to a markup
//! tree from `bindery-dom`:
//!
//! - **Directive catalog**: attribute names such as `v-text` and `v-html`
//! - **Compiler**: finds directives and `{{ key }}` placeholders and installs
//!   one subscriber per binding
//! - **Facade**: top-level data keys exposed on the instance
//! - **Instance**: observe, install the facade, compile against the root node
//!
//! ## Example
//!
//! ```rust
//! use bindery_core::{BinderConfig, Instance};
//! use bindery_dom::Document;
//! use serde_json::json;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let doc = Rc::new(RefCell::new(
//!     Document::parse(r#"<div id="app"><p>{{counter}}</p></div>"#).unwrap(),
//! ));
//! let vm = Instance::mount(Rc::clone(&doc), json!({ "counter": 1 }), &BinderConfig::default())
//!     .unwrap();
//!
//! vm.set("counter", 5).unwrap();
//! assert_eq!(doc.borrow().to_html(), r#"<div id="app"><p>5</p></div>"#);
//! ```

pub mod compiler;
pub mod config;
pub mod directive;
pub mod error;
pub mod facade;
pub mod instance;

pub use compiler::{interpolation, paint, Binding, Compiler};
pub use config::{BinderConfig, ConfigError};
pub use directive::{Directive, DirectiveTable};
pub use error::{BindError, BindResult};
pub use facade::Facade;
pub use instance::Instance;
