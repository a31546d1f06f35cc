//! Error types for mounting and binding

use crate::config::ConfigError;
use bindery_dom::DomError;
use bindery_reactive::ReactiveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindError {
    #[error(transparent)]
    Reactive(#[from] ReactiveError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Data must be a record, found {0}")]
    DataNotRecord(&'static str),

    #[error("Markup tree is already borrowed")]
    TreeBusy,
}

pub type BindResult<T> = Result<T, BindError>;
