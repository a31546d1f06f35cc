//! Configuration parsing and management.

use bindery_reactive::DEFAULT_MAX_NOTIFY_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Mount options, matching the bindery.yml schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinderConfig {
    /// Selector of the node whose descendants are compiled
    #[serde(default = "default_selector")]
    pub selector: String,

    /// Attribute prefix marking a directive (`v-text`, `v-html`)
    #[serde(default = "default_directive_prefix")]
    pub directive_prefix: String,

    /// Nesting limit for notifications triggered from inside updates
    #[serde(default = "default_max_notify_depth")]
    pub max_notify_depth: usize,
}

fn default_selector() -> String {
    String::from("#app")
}

fn default_directive_prefix() -> String {
    String::from("v-")
}

fn default_max_notify_depth() -> usize {
    DEFAULT_MAX_NOTIFY_DEPTH
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            directive_prefix: default_directive_prefix(),
            max_notify_depth: default_max_notify_depth(),
        }
    }
}

impl BinderConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text. Empty text yields the defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: BinderConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    pub fn with_directive_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.directive_prefix = prefix.into();
        self
    }

    pub fn with_max_notify_depth(mut self, depth: usize) -> Self {
        self.max_notify_depth = depth;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selector.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "selector",
                reason: "must not be empty".into(),
            });
        }
        if self.directive_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "directive_prefix",
                reason: "must not be empty".into(),
            });
        }
        if self.max_notify_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_notify_depth",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
