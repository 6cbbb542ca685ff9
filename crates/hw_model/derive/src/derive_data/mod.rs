//! The parsed form of a `#[derive(Model)]` input.

// -----------------------------------------------------------------------------
// Modules

mod attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes, VariantAttributes};

use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Generics, Ident, Member, Type};

/// A derive input after attribute parsing.
pub(crate) struct ModelMeta<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    pub hw_model: syn::Path,
}

impl ModelMeta<'_> {
    /// The model name: `#[model(name)]` or the type ident.
    pub fn model_name(&self) -> String {
        match &self.attrs.name {
            Some(name) => name.value(),
            None => self.ident.to_string(),
        }
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }
}

pub(crate) struct ModelField<'a> {
    pub member: Member,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl ModelField<'_> {
    /// The member name: `#[model(rename)]`, the field ident, or the
    /// position of a tuple field.
    pub fn name(&self) -> String {
        if let Some(rename) = &self.attrs.rename {
            return rename.value();
        }
        match &self.member {
            Member::Named(ident) => ident.to_string().trim_start_matches("r#").to_owned(),
            Member::Unnamed(index) => index.index.to_string(),
        }
    }
}

pub(crate) struct ModelVariant<'a> {
    pub ident: &'a Ident,
    pub attrs: VariantAttributes,
}

impl ModelVariant<'_> {
    pub fn name(&self) -> String {
        match &self.attrs.rename {
            Some(rename) => rename.value(),
            None => self.ident.to_string(),
        }
    }
}

pub(crate) enum ModelData<'a> {
    Struct(Vec<ModelField<'a>>),
    Enum(Vec<ModelVariant<'a>>),
}

/// Parses the whole input.
pub(crate) fn parse(ast: &DeriveInput) -> syn::Result<(ModelMeta<'_>, ModelData<'_>)> {
    if let Some(lifetime) = ast.generics.lifetimes().next() {
        return Err(syn::Error::new(
            lifetime.span(),
            "`Model` cannot be derived for types with lifetime parameters",
        ));
    }

    let meta = ModelMeta {
        ident: &ast.ident,
        generics: &ast.generics,
        attrs: TypeAttributes::parse_attrs(&ast.attrs)?,
        hw_model: crate::path::hw_model(),
    };

    let data = match &ast.data {
        Data::Struct(data) => {
            let fields = data
                .fields
                .iter()
                .enumerate()
                .map(|(index, field)| {
                    let member = match &field.ident {
                        Some(ident) => Member::Named(ident.clone()),
                        None => Member::Unnamed(syn::Index {
                            index: index as u32,
                            span: field.span(),
                        }),
                    };
                    Ok(ModelField {
                        member,
                        ty: &field.ty,
                        attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()?;
            ModelData::Struct(fields)
        }
        Data::Enum(data) => {
            if meta.is_generic() {
                return Err(syn::Error::new(
                    ast.generics.span(),
                    "`Model` cannot be derived for generic enums",
                ));
            }
            if let Some(base) = meta.attrs.subclass_of.first() {
                return Err(syn::Error::new(
                    base.span(),
                    "`subclass_of` requires a struct",
                ));
            }
            let variants = data
                .variants
                .iter()
                .map(|variant| {
                    if !matches!(variant.fields, Fields::Unit) {
                        return Err(syn::Error::new(
                            variant.span(),
                            "`Model` enums must be fieldless",
                        ));
                    }
                    Ok(ModelVariant {
                        ident: &variant.ident,
                        attrs: VariantAttributes::parse_attrs(&variant.attrs)?,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()?;
            ModelData::Enum(variants)
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "`Model` cannot be derived for unions",
            ));
        }
    };

    Ok((meta, data))
}
