//! Markup parser for well-formed fragments
//!
//! Handles elements, quoted/unquoted/bare attributes, void and self-closing
//! elements, raw-text elements (`script`, `style`), comments, doctype
//! declarations and the common character references. Mismatched or unclosed
//! tags are errors rather than being repaired.

use crate::error::{DomError, DomResult};
use crate::node::{is_raw_text, is_void, Attribute};

/// Parsed node, not yet attached to a document
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Parsed {
    Element {
        tag: String,
        attributes: Vec<Attribute>,
        children: Vec<Parsed>,
    },
    Text(String),
    Comment(String),
}

struct OpenElement {
    tag: String,
    attributes: Vec<Attribute>,
    children: Vec<Parsed>,
    offset: usize,
}

pub(crate) fn parse_fragment(input: &str) -> DomResult<Vec<Parsed>> {
    Parser { input, pos: 0 }.run()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> DomResult<Vec<Parsed>> {
        let mut top: Vec<Parsed> = Vec::new();
        let mut stack: Vec<OpenElement> = Vec::new();

        while self.pos < self.input.len() {
            let rest = self.rest();
            let node = if rest.starts_with("<!--") {
                Some(self.comment()?)
            } else if rest.starts_with("</") {
                let offset = self.pos;
                let tag = self.closing_tag()?;
                let open = stack.pop().ok_or_else(|| {
                    self.error_at(offset, format!("unexpected closing tag </{}>", tag))
                })?;
                if open.tag != tag {
                    return Err(self.error_at(
                        offset,
                        format!("expected </{}>, found </{}>", open.tag, tag),
                    ));
                }
                Some(Parsed::Element {
                    tag: open.tag,
                    attributes: open.attributes,
                    children: open.children,
                })
            } else if rest.starts_with("<!") {
                self.skip_declaration()?;
                None
            } else if starts_tag(rest) {
                let offset = self.pos;
                let (tag, attributes, self_closing) = self.opening_tag()?;
                if self_closing || is_void(&tag) {
                    Some(Parsed::Element {
                        tag,
                        attributes,
                        children: Vec::new(),
                    })
                } else if is_raw_text(&tag) {
                    let text = self.raw_text(&tag)?;
                    let children = if text.is_empty() {
                        Vec::new()
                    } else {
                        vec![Parsed::Text(text)]
                    };
                    Some(Parsed::Element {
                        tag,
                        attributes,
                        children,
                    })
                } else {
                    stack.push(OpenElement {
                        tag,
                        attributes,
                        children: Vec::new(),
                        offset,
                    });
                    None
                }
            } else {
                Some(Parsed::Text(self.text()))
            };

            if let Some(node) = node {
                match stack.last_mut() {
                    Some(open) => open.children.push(node),
                    None => top.push(node),
                }
            }
        }

        if let Some(open) = stack.pop() {
            return Err(self.error_at(open.offset, format!("unclosed <{}>", open.tag)));
        }
        Ok(top)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error_at(&self, offset: usize, message: String) -> DomError {
        DomError::Parse { offset, message }
    }

    fn comment(&mut self) -> DomResult<Parsed> {
        let body_start = self.pos + 4;
        let end = self.input[body_start..]
            .find("-->")
            .ok_or_else(|| self.error_at(self.pos, "unterminated comment".into()))?;
        let body = self.input[body_start..body_start + end].to_string();
        self.pos = body_start + end + 3;
        Ok(Parsed::Comment(body))
    }

    fn skip_declaration(&mut self) -> DomResult<()> {
        let end = self
            .rest()
            .find('>')
            .ok_or_else(|| self.error_at(self.pos, "unterminated declaration".into()))?;
        self.pos += end + 1;
        Ok(())
    }

    fn closing_tag(&mut self) -> DomResult<String> {
        let start = self.pos;
        self.pos += 2;
        let name = self.name();
        self.skip_whitespace();
        if !self.eat('>') || name.is_empty() {
            return Err(self.error_at(start, "malformed closing tag".into()));
        }
        Ok(name.to_ascii_lowercase())
    }

    fn opening_tag(&mut self) -> DomResult<(String, Vec<Attribute>, bool)> {
        let start = self.pos;
        self.pos += 1;
        let tag = self.name().to_ascii_lowercase();
        let mut attributes = Vec::new();

        loop {
            self.skip_whitespace();
            if self.eat('>') {
                return Ok((tag, attributes, false));
            }
            if self.rest().starts_with("/>") {
                self.pos += 2;
                return Ok((tag, attributes, true));
            }
            if self.pos >= self.input.len() {
                return Err(self.error_at(start, format!("unterminated <{}>", tag)));
            }

            let name = self.name().to_ascii_lowercase();
            if name.is_empty() {
                return Err(self.error_at(self.pos, "expected attribute name".into()));
            }
            self.skip_whitespace();
            let value = if self.eat('=') {
                self.skip_whitespace();
                self.attribute_value()?
            } else {
                String::new()
            };
            attributes.push(Attribute { name, value });
        }
    }

    fn attribute_value(&mut self) -> DomResult<String> {
        let start = self.pos;
        let raw = match self.rest().chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &self.input[self.pos + 1..];
                let end = body
                    .find(quote)
                    .ok_or_else(|| self.error_at(start, "unterminated attribute value".into()))?;
                self.pos += end + 2;
                &body[..end]
            }
            _ => {
                let len = self
                    .rest()
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(self.rest().len());
                let value = &self.input[self.pos..self.pos + len];
                self.pos += len;
                value
            }
        };
        Ok(decode_entities(raw))
    }

    fn raw_text(&mut self, tag: &str) -> DomResult<String> {
        let closing = format!("</{}", tag);
        let rest = self.rest();
        let end = rest
            .to_ascii_lowercase()
            .find(&closing)
            .ok_or_else(|| self.error_at(self.pos, format!("unclosed <{}>", tag)))?;
        let text = rest[..end].to_string();
        self.pos += end;
        self.closing_tag()?;
        Ok(text)
    }

    fn text(&mut self) -> String {
        let rest = self.rest();
        let mut end = rest.len();
        for (i, c) in rest.char_indices() {
            if c == '<' && i > 0 && starts_markup(&rest[i..]) {
                end = i;
                break;
            }
        }
        self.pos += end;
        decode_entities(&rest[..end])
    }

    fn name(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '>' | '/' | '='))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }
}

fn starts_tag(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn starts_markup(s: &str) -> bool {
    starts_tag(s) || s.starts_with("</") || s.starts_with("<!")
}

/// Decode the character references markup authors actually write
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut remaining = raw;

    while let Some(start) = remaining.find('&') {
        out.push_str(&remaining[..start]);
        let candidate = &remaining[start..];
        let decoded = candidate.find(';').and_then(|end| {
            let name = &candidate[1..end];
            decode_reference(name).map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                remaining = &candidate[consumed..];
            }
            None => {
                out.push('&');
                remaining = &candidate[1..];
            }
        }
    }
    out.push_str(remaining);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
