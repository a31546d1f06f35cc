//! Bindery Reactive - dependency-tracking records
//!
//! This crate provides the reactivity engine behind bindery templates:
//!
//! - **Records**: key/value maps whose keys are individually observed cells
//! - **Dependency registries**: one [`Dep`] per observed key
//! - **Subscribers**: units of reactive work that discover their dependencies
//!   by reading while they are the active reader
//!
//! ## Data flow
//!
//! ```text
//! Subscriber::new ──read──▶ Record::get ──register──▶ Dep
//! Record::set ──notify──▶ Dep ──update──▶ Subscriber ──▶ callback(value)
//! ```
//!
//! Everything is single-threaded and synchronous: a write returns only after
//! every subscriber of the written key has been updated.
//!
//! ## Example
//!
//! ```rust
//! use bindery_reactive::{KeyPath, Record, Subscriber, Value};
//! use serde_json::json;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let data = Record::from_value(json!({ "counter": 1 })).unwrap();
//! let painted = Rc::new(RefCell::new(String::new()));
//!
//! let sink = Rc::clone(&painted);
//! let _sub = Subscriber::new(&data, KeyPath::single("counter"), move |value: &Value| {
//!     *sink.borrow_mut() = value.to_string();
//!     Ok(())
//! })
//! .unwrap();
//!
//! data.set("counter", 5).unwrap();
//! assert_eq!(*painted.borrow(), "5");
//! ```

pub mod dep;
pub mod error;
pub mod record;
pub mod subscriber;
pub mod value;

pub use dep::{
    max_notify_depth, scoped_max_notify_depth, set_max_notify_depth, Dep, NotifyLimitScope,
    DEFAULT_MAX_NOTIFY_DEPTH,
};
pub use error::{ReactiveError, ReactiveResult};
pub use record::Record;
pub use subscriber::{has_active_reader, KeyPath, Subscriber, SubscriberId, UpdateFn};
pub use value::Value;
