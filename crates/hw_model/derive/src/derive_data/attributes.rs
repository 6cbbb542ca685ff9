//! Parsing of `#[model(...)]` attributes.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Path, Type, parenthesized};

use crate::MODEL_ATTRIBUTE_NAME;

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(value);
    Ok(())
}

fn for_each_model_attr(
    attrs: &[Attribute],
    mut f: impl FnMut(ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident(MODEL_ATTRIBUTE_NAME) {
            attr.parse_nested_meta(&mut f)?;
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Type level attributes.
///
/// - `name = "..."`: the model name, defaults to the type ident.
/// - `tag = "..."`: a metadata tag, repeatable.
/// - `subclass_of(dyn Base)`: registers the type as a subclass, repeatable.
/// - `exchange_name = "..."`: the discriminator written for the type.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub name: Option<LitStr>,
    pub tags: Vec<LitStr>,
    pub subclass_of: Vec<Type>,
    pub exchange_name: Option<LitStr>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_model_attr(attrs, |meta| {
            if meta.path.is_ident("name") {
                let value = meta.value()?.parse()?;
                set_once(&mut this.name, value, &meta)
            } else if meta.path.is_ident("tag") {
                this.tags.push(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("subclass_of") {
                let content;
                parenthesized!(content in meta.input);
                this.subclass_of.push(content.parse()?);
                Ok(())
            } else if meta.path.is_ident("exchange_name") {
                let value = meta.value()?.parse()?;
                set_once(&mut this.exchange_name, value, &meta)
            } else {
                Err(meta.error("unsupported type attribute, expected `name`, `tag`, `subclass_of` or `exchange_name`"))
            }
        })?;
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Field level attributes.
///
/// - `rename = "..."`: the member name, defaults to the field ident.
/// - `tag = "..."`: a metadata tag, repeatable.
/// - `skip`: the field is not a member.
/// - `convert(A, B)`: `Conversion` constants tried before the field's own
///   value access.
/// - `no_default_conversion`: only the listed conversions are used.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub tags: Vec<LitStr>,
    pub skip: bool,
    pub convert: Vec<Path>,
    pub no_default_conversion: bool,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_model_attr(attrs, |meta| {
            if meta.path.is_ident("rename") {
                let value = meta.value()?.parse()?;
                set_once(&mut this.rename, value, &meta)
            } else if meta.path.is_ident("tag") {
                this.tags.push(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("skip") {
                this.skip = true;
                Ok(())
            } else if meta.path.is_ident("convert") {
                meta.parse_nested_meta(|inner| {
                    this.convert.push(inner.path);
                    Ok(())
                })
            } else if meta.path.is_ident("no_default_conversion") {
                this.no_default_conversion = true;
                Ok(())
            } else {
                Err(meta.error(
                    "unsupported field attribute, expected `rename`, `tag`, `skip`, `convert` or `no_default_conversion`",
                ))
            }
        })?;
        Ok(this)
    }

    #[inline]
    pub fn is_converted(&self) -> bool {
        !self.convert.is_empty() || self.no_default_conversion
    }
}

// -----------------------------------------------------------------------------
// VariantAttributes

/// Enum variant attributes: `rename = "..."`, the symbol name.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_model_attr(attrs, |meta| {
            if meta.path.is_ident("rename") {
                let value = meta.value()?.parse()?;
                set_once(&mut this.rename, value, &meta)
            } else {
                Err(meta.error("unsupported variant attribute, expected `rename`"))
            }
        })?;
        Ok(this)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_attributes() {
        let field: syn::Field = syn::parse_quote! {
            #[model(rename = "Id", tag = "sql:pk", tag = "sql:auto")]
            #[model(convert(AS_TEXT, conv::AS_FLAG), no_default_conversion)]
            id: u32
        };
        let attrs = FieldAttributes::parse_attrs(&field.attrs).unwrap();
        assert_eq!(attrs.rename.unwrap().value(), "Id");
        assert_eq!(attrs.tags.len(), 2);
        assert_eq!(attrs.convert.len(), 2);
        assert!(attrs.no_default_conversion);
        assert!(!attrs.skip);
    }

    #[test]
    fn type_attributes() {
        let input: syn::DeriveInput = syn::parse_quote! {
            #[model(subclass_of(dyn Shape), exchange_name = "circle", tag = "xml:root")]
            struct Circle;
        };
        let attrs = TypeAttributes::parse_attrs(&input.attrs).unwrap();
        assert_eq!(attrs.subclass_of.len(), 1);
        assert_eq!(attrs.exchange_name.unwrap().value(), "circle");
        assert!(attrs.name.is_none());
    }

    #[test]
    fn rejects_unknown_and_duplicates() {
        let input: syn::DeriveInput = syn::parse_quote! {
            #[model(nmae = "x")]
            struct A;
        };
        assert!(TypeAttributes::parse_attrs(&input.attrs).is_err());

        let input: syn::DeriveInput = syn::parse_quote! {
            #[model(name = "x", name = "y")]
            struct A;
        };
        assert!(TypeAttributes::parse_attrs(&input.attrs).is_err());
    }
}
