//! Render command implementation.

use super::{mount, MountOptions};
use anyhow::{anyhow, Context, Result};

/// Split `key=<json>`. A value that is not valid JSON is taken as a string.
pub fn parse_assignment(raw: &str) -> Result<(String, serde_json::Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected KEY=JSON, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Missing key in '{}'", raw));
    }

    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Mount, apply each write in order, print the document
pub fn render(opts: &MountOptions, sets: &[String]) -> Result<()> {
    let (document, instance) = mount(opts)?;

    for raw in sets {
        let (key, value) = parse_assignment(raw)?;
        tracing::debug!("Setting {} = {}", key, value);
        instance
            .set(&key, value)
            .with_context(|| format!("Failed to set '{}'", key))?;
    }

    println!("{}", document.borrow().to_html());
    Ok(())
}
