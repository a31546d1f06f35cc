//! Directive catalog
//!
//! Directive attributes (`v-text="key"`) are resolved through an explicit
//! table from directive name to [`Directive`]. Names missing from the table
//! are ignored by the compiler.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// How a binding paints its value into the markup tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    /// Replace the node's text content
    Text,
    /// Replace the node's children with parsed markup
    Html,
}

impl Directive {
    pub const ALL: [Directive; 2] = [Directive::Text, Directive::Html];

    pub fn name(self) -> &'static str {
        match self {
            Directive::Text => "text",
            Directive::Html => "html",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name → directive lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveTable {
    entries: IndexMap<String, Directive>,
}

impl Default for DirectiveTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for directive in Directive::ALL {
            table.register(directive.name(), directive);
        }
        table
    }
}

impl DirectiveTable {
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Register (or replace) a name. Returns the previous directive.
    pub fn register(&mut self, name: impl Into<String>, directive: Directive) -> Option<Directive> {
        self.entries.insert(name.into(), directive)
    }

    pub fn lookup(&self, name: &str) -> Option<Directive> {
        self.entries.get(name).copied()
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
