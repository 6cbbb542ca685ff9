use hw_model::format::Deserializer;
use hw_model::hook::NameMatch;
use hw_model::part::{Model, ModelPartType, RootMut};
use hw_model::value::Primitive;
use hw_model::{Error, Result};
use log::warn;

use super::parser::{self, Element};
use super::{ATTRIBUTE_FLAG, NIL_ATTR, TYPE_ATTR, XmlOptions, element_name, member_of_xml_name};
use crate::UnknownFields;

/// Populates a Complex root from an XML document.
#[derive(Debug, Clone, Copy)]
pub struct XmlDeserializer<'s> {
    input: &'s str,
    options: XmlOptions,
}

impl<'s> XmlDeserializer<'s> {
    #[inline]
    pub fn new(input: &'s str) -> Self {
        Self::with_options(input, XmlOptions::default())
    }

    #[inline]
    pub fn with_options(input: &'s str, options: XmlOptions) -> Self {
        Self { input, options }
    }
}

impl Deserializer for XmlDeserializer<'_> {
    const NAME: &'static str = "xml";

    fn supports(&self, part_type: ModelPartType) -> bool {
        part_type == ModelPartType::Complex
    }

    fn deserialize(self, root: RootMut<'_>) -> Result<()> {
        let document = parser::parse(self.input)?;
        let node = root.into_node();
        let populate = Populate {
            options: self.options,
        };
        let expected = element_name(node);
        if !populate.names_match(&document.name, expected) {
            populate.unknown(node.model_name(), &document.name)?;
        }
        populate.node(&document, node)
    }
}

// -----------------------------------------------------------------------------
// Populate

struct Populate {
    options: XmlOptions,
}

impl Populate {
    fn names_match(&self, found: &str, expected: &str) -> bool {
        match self.options.name_match {
            NameMatch::Exact => found == expected,
            NameMatch::CaseInsensitive | NameMatch::Folded => found.eq_ignore_ascii_case(expected),
        }
    }

    /// Fails or warns about a name `owner` has no member for.
    fn unknown(&self, owner: &'static str, name: &str) -> Result<()> {
        match self.options.unknown_elements {
            UnknownFields::Error => Err(Error::IncorrectElementName {
                owner,
                name: name.into(),
            }),
            UnknownFields::Ignore => {
                warn!("ignoring unknown xml name `{name}` in `{owner}`");
                Ok(())
            }
        }
    }

    fn node(&self, element: &Element, node: &mut dyn Model) -> Result<()> {
        if element.attribute(NIL_ATTR) == Some("true") {
            return node.set_null();
        }

        match node.part_type() {
            ModelPartType::Null => node.set_null(),
            ModelPartType::Simple => node.set_value(Primitive::String(element.text.clone())),
            ModelPartType::Complex => match element.attribute(TYPE_ATTR) {
                Some(type_name) if node.is_polymorphic() => {
                    node.subclass_part(type_name, &mut |inner| self.members(element, inner))
                }
                type_name => {
                    if let Some(type_name) = type_name {
                        warn!(
                            "ignoring `{TYPE_ATTR}=\"{type_name}\"` on non-polymorphic `{}`",
                            node.model_name()
                        );
                    }
                    node.create()?;
                    self.members(element, node)
                }
            },
            ModelPartType::Sequence => {
                node.create()?;
                for item in &element.children {
                    node.create_element(&mut |slot| self.node(item, slot))?;
                }
                node.complete()
            }
            ModelPartType::Dictionary => {
                node.create()?;
                for entry in &element.children {
                    let (Some(key), Some(value)) = (entry.child("key"), entry.child("value")) else {
                        return Err(Error::malformed(alloc::format!(
                            "dictionary entry `{}` needs `key` and `value` children",
                            entry.name
                        )));
                    };
                    node.create_element(&mut |pair| {
                        pair.child_at_mut(0, &mut |slot| self.node(key, slot))?;
                        pair.child_at_mut(1, &mut |slot| self.node(value, slot))
                    })?;
                }
                node.complete()
            }
        }
    }

    /// Fills a Complex node from attributes and child elements.
    ///
    /// A name may match several members under case-insensitive lookup;
    /// attributes prefer a member flagged as an attribute and child elements
    /// prefer one that is not, before falling back to the first match.
    fn members(&self, element: &Element, node: &mut dyn Model) -> Result<()> {
        for (name, value) in &element.attributes {
            if name == TYPE_ATTR || name == NIL_ATTR || name == "xmlns" || name.starts_with("xmlns:") {
                continue;
            }
            match self.position(node, name, true) {
                Some(position) => node.child_at_mut(position, &mut |slot| {
                    slot.set_value(Primitive::String(value.clone()))
                })?,
                None => self.unknown(node.model_name(), name)?,
            }
        }

        for child in &element.children {
            match self.position(node, &child.name, false) {
                Some(position) => node.child_at_mut(position, &mut |slot| self.node(child, slot))?,
                None => self.unknown(node.model_name(), &child.name)?,
            }
        }

        node.complete()
    }

    fn position(&self, node: &dyn Model, name: &str, attribute: bool) -> Option<usize> {
        let mut matches = node.matches(member_of_xml_name(name), self.options.name_match);
        let first = matches.clone().next()?;
        let preferred = matches.find(|(_, hook)| hook.metadata().has_flag(ATTRIBUTE_FLAG) == attribute);
        Some(preferred.unwrap_or(first).0)
    }
}
