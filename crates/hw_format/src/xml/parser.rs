//! A small non-validating XML parser.
//!
//! Handles the subset the writer produces plus what hand-written documents
//! commonly contain: a prolog, comments, processing instructions, a
//! `DOCTYPE` without an internal subset, CDATA sections, the predefined
//! entities and numeric character references. Namespaces are not resolved;
//! prefixed names are kept as written.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hw_model::{Error, Result};

/// Elements nested deeper than this are rejected.
const MAX_DEPTH: usize = 128;

/// One parsed element.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated character data of this element, CDATA included.
    pub text: String,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }
}

/// Parses a whole document and returns its root element.
pub(crate) fn parse(input: &str) -> Result<Element> {
    let mut parser = Parser { input, pos: 0 };
    parser.misc()?;
    if parser.rest().starts_with("<!DOCTYPE") {
        parser.skip_past(">")?;
        parser.misc()?;
    }
    if !parser.rest().starts_with('<') {
        return Err(parser.error("expected the root element"));
    }
    let root = parser.element(0)?;
    parser.misc()?;
    if !parser.rest().is_empty() {
        return Err(parser.error("content after the root element"));
    }
    Ok(root)
}

// -----------------------------------------------------------------------------
// Parser

struct Parser<'i> {
    input: &'i str,
    pos: usize,
}

impl<'i> Parser<'i> {
    #[inline]
    fn rest(&self) -> &'i str {
        &self.input[self.pos..]
    }

    #[cold]
    fn error(&self, what: &str) -> Error {
        let consumed = &self.input[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed.len() - consumed.rfind('\n').map_or(0, |at| at + 1) + 1;
        Error::malformed(format!("{what} at line {line}, column {column}"))
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{token}`")))
        }
    }

    /// Advances past the next `end` and returns what came before it.
    fn skip_past(&mut self, end: &str) -> Result<&'i str> {
        match self.rest().find(end) {
            Some(at) => {
                let skipped = &self.rest()[..at];
                self.pos += at + end.len();
                Ok(skipped)
            }
            None => Err(self.error(&format!("unterminated construct, expected `{end}`"))),
        }
    }

    fn whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Whitespace, comments and processing instructions outside the root.
    fn misc(&mut self) -> Result<()> {
        loop {
            self.whitespace();
            if self.eat("<?") {
                self.skip_past("?>")?;
            } else if self.eat("<!--") {
                self.skip_past("-->")?;
            } else {
                return Ok(());
            }
        }
    }

    fn name(&mut self) -> Result<&'i str> {
        let rest = self.rest();
        let len = rest
            .find(|ch: char| !(ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':')))
            .unwrap_or(rest.len());
        let name = &rest[..len];
        if name.is_empty() || name.starts_with(|ch: char| ch.is_ascii_digit() || ch == '-' || ch == '.') {
            return Err(self.error("expected a name"));
        }
        self.pos += len;
        Ok(name)
    }

    fn element(&mut self, depth: usize) -> Result<Element> {
        if depth >= MAX_DEPTH {
            return Err(self.error("elements nested too deeply"));
        }
        self.expect("<")?;
        let mut element = Element {
            name: self.name()?.into(),
            ..Element::default()
        };

        loop {
            self.whitespace();
            if self.eat("/>") {
                return Ok(element);
            }
            if self.eat(">") {
                break;
            }
            let key = self.name()?;
            self.whitespace();
            self.expect("=")?;
            self.whitespace();
            let quote = if self.eat("\"") {
                "\""
            } else if self.eat("'") {
                "'"
            } else {
                return Err(self.error("expected a quoted attribute value"));
            };
            let raw = self.skip_past(quote)?;
            if raw.contains('<') {
                return Err(self.error("`<` in attribute value"));
            }
            if element.attribute(key).is_some() {
                return Err(self.error(&format!("duplicate attribute `{key}`")));
            }
            let value = self.unescape(raw)?;
            element.attributes.push((key.into(), value));
        }

        self.content(&mut element, depth)?;
        Ok(element)
    }

    /// Reads children and text up to and including the end tag.
    fn content(&mut self, element: &mut Element, depth: usize) -> Result<()> {
        loop {
            let rest = self.rest();
            let text_len = rest.find('<').unwrap_or(rest.len());
            if text_len > 0 {
                let text = self.unescape(&rest[..text_len])?;
                element.text.push_str(&text);
                self.pos += text_len;
            }

            if self.rest().is_empty() {
                return Err(self.error(&format!("unclosed element `{}`", element.name)));
            } else if self.eat("</") {
                let name = self.name()?;
                if name != element.name {
                    return Err(self.error(&format!(
                        "end tag `{name}` does not match `{}`",
                        element.name
                    )));
                }
                self.whitespace();
                return self.expect(">");
            } else if self.eat("<!--") {
                self.skip_past("-->")?;
            } else if self.eat("<![CDATA[") {
                let data = self.skip_past("]]>")?;
                element.text.push_str(data);
            } else if self.eat("<?") {
                self.skip_past("?>")?;
            } else {
                let child = self.element(depth + 1)?;
                element.children.push(child);
            }
        }
    }

    fn unescape(&self, raw: &str) -> Result<String> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(at) = rest.find('&') {
            out.push_str(&rest[..at]);
            rest = &rest[at + 1..];
            let Some(end) = rest.find(';') else {
                return Err(self.error("unterminated entity reference"));
            };
            let entity = &rest[..end];
            let ch = match entity {
                "lt" => '<',
                "gt" => '>',
                "amp" => '&',
                "quot" => '"',
                "apos" => '\'',
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else if let Some(decimal) = entity.strip_prefix('#') {
                        decimal.parse().ok()
                    } else {
                        None
                    };
                    code.and_then(char::from_u32)
                        .ok_or_else(|| self.error(&format!("unknown entity `&{entity};`")))?
                }
            };
            out.push(ch);
            rest = &rest[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

// -----------------------------------------------------------------------------
// Tests
