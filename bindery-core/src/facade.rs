//! Top-level key forwarding
//!
//! The facade exposes every key the data record had when it was installed.
//! Reads and writes go straight to the observed record, so they pass through
//! the same read/write traps as any other access.

use crate::error::{BindError, BindResult};
use bindery_reactive::{KeyPath, Record, Value};

#[derive(Debug, Clone)]
pub struct Facade {
    data: Record,
    keys: Vec<String>,
}

impl Facade {
    /// Snapshot the record's own keys and forward them
    pub fn install(data: &Record) -> Self {
        let keys = data.keys();
        tracing::debug!(keys = keys.len(), "facade installed");
        Self {
            data: data.clone(),
            keys,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn data(&self) -> &Record {
        &self.data
    }

    fn check(&self, key: &str) -> BindResult<()> {
        if self.has_key(key) {
            Ok(())
        } else {
            Err(BindError::UnknownKey(key.to_string()))
        }
    }

    pub fn get(&self, key: &str) -> BindResult<Value> {
        self.check(key)?;
        Ok(self.data.get(key)?)
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) -> BindResult<()> {
        self.check(key)?;
        Ok(self.data.set(key, value)?)
    }

    /// Read a dotted path whose first segment is a facade key
    pub fn read_path(&self, path: &KeyPath) -> BindResult<Value> {
        self.check(path.root_key())?;
        Ok(path.resolve(&self.data)?)
    }
}
