//! Observed records
//!
//! A [`Record`] maps each own key to a cell holding the key's current value
//! and its [`Dep`]. [`Record::get`] is the read trap (it registers the active
//! reader) and [`Record::set`] is the write trap (identity check, deep
//! observation of the new value, synchronous notification).
//!
//! Records are shared handles: cloning a `Record` gives another handle to the
//! same cells, and record identity is handle identity.

use crate::dep::Dep;
use crate::error::{ReactiveError, ReactiveResult};
use crate::subscriber::active_reader;
use crate::value::Value;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One observed key: current value plus its registry
struct Cell {
    value: RefCell<Value>,
    dep: Dep,
}

impl Cell {
    fn new(key: &str, value: Value) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(value),
            dep: Dep::new(key),
        })
    }
}

/// A reactive key/value record
#[derive(Clone, Default)]
pub struct Record {
    cells: Rc<RefCell<IndexMap<String, Rc<Cell>>>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a plain JSON object. Nested objects and arrays are observed
    /// recursively.
    pub fn from_plain(map: Map<String, JsonValue>) -> Self {
        let record = Self::new();
        {
            let mut cells = record.cells.borrow_mut();
            for (key, plain) in map {
                let cell = Cell::new(&key, Value::from(plain));
                cells.insert(key, cell);
            }
        }
        record
    }

    /// Observe a JSON array as a record keyed by index. Length changes are
    /// not tracked.
    pub fn from_items(items: Vec<JsonValue>) -> Self {
        let record = Self::new();
        {
            let mut cells = record.cells.borrow_mut();
            for (index, plain) in items.into_iter().enumerate() {
                let key = index.to_string();
                let cell = Cell::new(&key, Value::from(plain));
                cells.insert(key, cell);
            }
        }
        record
    }

    /// Observe any JSON value that is an object or array.
    pub fn from_value(plain: JsonValue) -> ReactiveResult<Self> {
        match Value::from(plain) {
            Value::Record(record) => Ok(record),
            other => Err(ReactiveError::ExpectedRecord(other.type_name())),
        }
    }

    fn cell(&self, key: &str) -> Option<Rc<Cell>> {
        self.cells.borrow().get(key).cloned()
    }

    /// Read a key, registering the active reader (if any) with its registry.
    pub fn get(&self, key: &str) -> ReactiveResult<Value> {
        let cell = self
            .cell(key)
            .ok_or_else(|| ReactiveError::MissingKey(key.to_string()))?;

        if let Some(reader) = active_reader() {
            cell.dep.register_inner(&reader);
        }

        let value = cell.value.borrow().clone();
        Ok(value)
    }

    /// Read a key without registering anything
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.cell(key).map(|cell| cell.value.borrow().clone())
    }

    /// Write a key.
    ///
    /// An identical value is a no-op. Otherwise the value is stored and every
    /// subscriber of the key is updated before this returns. If an update
    /// fails the new value stays stored and the error is returned.
    ///
    /// An update that writes back to the same key re-enters this method; the
    /// nesting is bounded by [`crate::max_notify_depth`].
    pub fn set(&self, key: &str, value: impl Into<Value>) -> ReactiveResult<()> {
        let value = value.into();

        let Some(cell) = self.cell(key) else {
            tracing::trace!(key, "adding key");
            self.cells
                .borrow_mut()
                .insert(key.to_string(), Cell::new(key, value));
            return Ok(());
        };

        if cell.value.borrow().same(&value) {
            return Ok(());
        }

        *cell.value.borrow_mut() = value;
        cell.dep.notify()
    }

    /// Own keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.cells.borrow().keys().cloned().collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.borrow().is_empty()
    }

    /// Registry for a key
    pub fn dep(&self, key: &str) -> Option<Dep> {
        self.cell(key).map(|cell| cell.dep.clone())
    }

    /// Live registrations on a key (zero for unknown keys)
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.cell(key).map_or(0, |cell| cell.dep.len())
    }

    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }

    /// Snapshot as plain JSON without registering any reads
    pub fn to_plain(&self) -> JsonValue {
        let cells = self.cells.borrow();
        let map = cells
            .iter()
            .map(|(key, cell)| (key.clone(), cell.value.borrow().to_plain()))
            .collect::<Map<String, JsonValue>>();
        JsonValue::Object(map)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({})", self.to_plain())
    }
}
