//! Simple selectors: `tag`, `#id`, `.class` and their compounds

use crate::error::{DomError, DomResult};
use crate::node::Attribute;

/// A compound selector such as `div#app.main`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Selector {
    pub fn parse(raw: &str) -> DomResult<Self> {
        let invalid = || DomError::InvalidSelector(raw.to_string());
        let input = raw.trim();
        if input.is_empty() {
            return Err(invalid());
        }

        let mut selector = Selector::default();
        let mut rest = input;

        let tag_len = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag != "*" {
                if !is_ident(tag) {
                    return Err(invalid());
                }
                selector.tag = Some(tag.to_ascii_lowercase());
            }
            rest = &rest[tag_len..];
        }

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let len = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..len];
            if !is_ident(name) {
                return Err(invalid());
            }
            match marker {
                '#' if selector.id.is_none() => selector.id = Some(name.to_string()),
                '.' => selector.classes.push(name.to_string()),
                _ => return Err(invalid()),
            }
            rest = &body[len..];
        }

        Ok(selector)
    }

    pub fn matches(&self, tag: &str, attributes: &[Attribute]) -> bool {
        if let Some(expected) = &self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        let attr = |name: &str| {
            attributes
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str())
        };

        if let Some(id) = &self.id {
            if attr("id") != Some(id.as_str()) {
                return false;
            }
        }

        if !self.classes.is_empty() {
            let present: Vec<&str> = attr("class").unwrap_or("").split_whitespace().collect();
            if !self.classes.iter().all(|c| present.contains(&c.as_str())) {
                return false;
            }
        }

        true
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
