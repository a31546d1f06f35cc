//! CLI command implementations.

pub mod bindings;
pub mod render;

pub use bindings::list_bindings;
pub use render::render;

use anyhow::{Context, Result};
use bindery_core::{BinderConfig, Instance};
use bindery_dom::Document;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct MountOptions {
    pub template: PathBuf,
    pub data: PathBuf,
    pub config: Option<PathBuf>,
    pub selector: Option<String>,
}

/// Load the inputs and mount the template
pub fn mount(opts: &MountOptions) -> Result<(Rc<RefCell<Document>>, Instance<Document>)> {
    let mut config = match &opts.config {
        Some(path) => {
            tracing::info!("Loading config from {:?}", path);
            BinderConfig::from_file(path).context("Failed to load configuration")?
        }
        None => BinderConfig::default(),
    };
    if let Some(selector) = &opts.selector {
        config = config.with_selector(selector.clone());
    }

    let markup = fs::read_to_string(&opts.template)
        .with_context(|| format!("Failed to read template {:?}", opts.template))?;
    let document = Document::parse(&markup).context("Failed to parse template")?;

    let data = fs::read_to_string(&opts.data)
        .with_context(|| format!("Failed to read data {:?}", opts.data))?;
    let data: serde_json::Value =
        serde_json::from_str(&data).context("Failed to parse data as JSON")?;

    let document = Rc::new(RefCell::new(document));
    let instance = Instance::mount(Rc::clone(&document), data, &config)
        .context("Failed to mount template")?;

    tracing::debug!("Mounted {} bindings", instance.bindings().len());
    Ok((document, instance))
}
