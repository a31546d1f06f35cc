//! Bindings command implementation.

use super::{mount, MountOptions};
use anyhow::Result;
use bindery_core::Directive;
use serde::Serialize;

#[derive(Serialize)]
struct BindingSummary {
    node: String,
    directive: Directive,
    path: String,
}

/// Print one line per binding, in discovery order
pub fn list_bindings(opts: &MountOptions, json: bool) -> Result<()> {
    let (_document, instance) = mount(opts)?;

    let summaries: Vec<BindingSummary> = instance
        .bindings()
        .iter()
        .map(|b| BindingSummary {
            node: b.node().to_string(),
            directive: b.directive(),
            path: b.path().to_string(),
        })
        .collect();

    if json {
        let payload = serde_json::to_string_pretty(&summaries)?;
        println!("{}", payload);
    } else {
        for summary in &summaries {
            println!("{} {}", summary.directive, summary.path);
        }
    }
    Ok(())
}
