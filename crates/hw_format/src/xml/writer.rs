use alloc::string::{String, ToString};

use hw_model::format::Serializer;
use hw_model::metadata::Metadata;
use hw_model::part::{ChildKey, Model, ModelPartType, RootRef};
use hw_model::value::{Primitive, PrimitiveKinds};
use hw_model::Result;

use super::{ATTRIBUTE_FLAG, ITEM_KEY, NIL_ATTR, TYPE_ATTR, element_name, xml_member_name};

/// Writes a Complex root as an XML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer {
    indent: Option<usize>,
    declaration: bool,
}

impl XmlSerializer {
    /// Compact output without a declaration.
    #[inline]
    pub const fn new() -> Self {
        Self {
            indent: None,
            declaration: false,
        }
    }

    /// Puts every element on its own line, indented by `width` spaces per
    /// level.
    #[inline]
    pub const fn indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Starts the document with `<?xml version="1.0" encoding="UTF-8"?>`.
    #[inline]
    pub const fn declaration(mut self, yes: bool) -> Self {
        self.declaration = yes;
        self
    }
}

impl Serializer for XmlSerializer {
    type Output = String;
    const NAME: &'static str = "xml";

    fn supports(&self, part_type: ModelPartType) -> bool {
        part_type == ModelPartType::Complex
    }

    fn serialize(self, root: RootRef<'_>) -> Result<String> {
        let mut writer = Writer {
            out: String::new(),
            indent: self.indent,
            depth: 0,
        };
        if self.declaration {
            writer.out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        }
        let node = root.node();
        writer.element(element_name(node), node, Metadata::EMPTY)?;
        if writer.indent.is_some() {
            writer.out.push('\n');
        }
        Ok(writer.out)
    }
}

// -----------------------------------------------------------------------------
// Writer

struct Writer {
    out: String,
    indent: Option<usize>,
    depth: usize,
}

impl Writer {
    fn newline(&mut self) {
        if let Some(width) = self.indent {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            self.out.extend(core::iter::repeat_n(' ', width * self.depth));
        }
    }

    fn open(&mut self, name: &str) {
        self.newline();
        self.out.push('<');
        self.out.push_str(name);
    }

    fn attribute(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        escape(&mut self.out, value, true);
        self.out.push('"');
    }

    fn close(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    /// Writes the children of a container between its tags.
    fn nested(&mut self, name: &str, f: impl FnOnce(&mut Self) -> Result<bool>) -> Result<()> {
        self.out.push('>');
        self.depth += 1;
        let wrote_any = f(self)?;
        self.depth -= 1;
        if wrote_any {
            self.newline();
        }
        self.close(name);
        Ok(())
    }

    /// `meta` describes the member holding `node`, if any.
    fn element(&mut self, name: &str, node: &dyn Model, meta: Metadata) -> Result<()> {
        if !node.has_value() {
            self.open(name);
            self.attribute(NIL_ATTR, "true");
            self.out.push_str("/>");
            return Ok(());
        }

        match node.part_type() {
            ModelPartType::Null => {
                self.open(name);
                self.out.push_str("/>");
            }
            ModelPartType::Simple => {
                self.open(name);
                match text_of(node)? {
                    Some(text) => {
                        self.out.push('>');
                        escape(&mut self.out, &text, false);
                        self.close(name);
                    }
                    None => {
                        self.attribute(NIL_ATTR, "true");
                        self.out.push_str("/>");
                    }
                }
            }
            ModelPartType::Complex => self.complex(name, node)?,
            ModelPartType::Sequence => {
                let item = meta.value(ITEM_KEY).unwrap_or("item");
                self.open(name);
                self.nested(name, |this| {
                    node.for_each_child(&mut |_, element| this.element(item, element, Metadata::EMPTY))?;
                    Ok(node.child_count() > 0)
                })?;
            }
            ModelPartType::Dictionary => {
                self.open(name);
                self.nested(name, |this| {
                    node.for_each_child(&mut |_, pair| this.element("entry", pair, Metadata::EMPTY))?;
                    Ok(node.child_count() > 0)
                })?;
            }
        }
        Ok(())
    }

    fn complex(&mut self, name: &str, node: &dyn Model) -> Result<()> {
        self.open(name);
        if let Some(type_name) = node.type_id_name() {
            self.attribute(TYPE_ATTR, &type_name);
        }

        // Attributes have to be written before the first child element.
        node.for_each_child(&mut |key, child| {
            if is_attribute(&key, child)
                && let Some(text) = text_of(child)?
            {
                self.attribute(&xml_member_name(key.name().unwrap_or_default()), &text);
            }
            Ok(())
        })?;

        self.nested(name, |this| {
            let mut wrote_any = false;
            node.for_each_child(&mut |key, child| {
                if !child.has_value() || is_attribute(&key, child) {
                    return Ok(());
                }
                wrote_any = true;
                this.element(&xml_member_name(key.name().unwrap_or_default()), child, key.metadata())
            })?;
            Ok(wrote_any)
        })
    }
}

/// Whether a member goes into an attribute rather than a child element.
fn is_attribute(key: &ChildKey<'_>, child: &dyn Model) -> bool {
    key.metadata().has_flag(ATTRIBUTE_FLAG)
        && child.has_value()
        && child.part_type() == ModelPartType::Simple
}

fn text_of(node: &dyn Model) -> Result<Option<String>> {
    Ok(node.get_value(PrimitiveKinds::all())?.map(|value| match value {
        Primitive::String(text) => text,
        other => other.to_string(),
    }))
}

fn escape(out: &mut String, text: &str, in_attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\n' if in_attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' if in_attribute => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
}
