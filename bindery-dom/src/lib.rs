//! # bindery-dom
//!
//! The markup host used by bindery templates.
//!
//! [`MarkupTree`] is the narrow interface the template compiler consumes:
//! selector lookup, child traversal, attribute and text access, and the two
//! paint primitives (text content and raw inner markup). [`Document`] is an
//! in-memory arena implementation with a small markup parser and serializer.
//!
//! ```rust
//! use bindery_dom::{Document, MarkupTree};
//!
//! let mut doc = Document::parse(r#"<div id="app"><p>old</p></div>"#).unwrap();
//! let p = doc.query_selector("p").unwrap();
//! doc.set_text_content(p, "new").unwrap();
//! assert_eq!(doc.to_html(), r#"<div id="app"><p>new</p></div>"#);
//! ```

pub mod document;
pub mod error;
pub mod node;
pub mod parser;
pub mod selector;
pub mod tree;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use node::{Attribute, NodeId, NodeType};
pub use parser::decode_entities;
pub use selector::Selector;
pub use tree::MarkupTree;
