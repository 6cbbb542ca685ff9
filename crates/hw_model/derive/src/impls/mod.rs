//! Code generation.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod enum_kind;
mod struct_kind;
mod subclass;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, parse_quote};

use crate::derive_data::{self, ModelData, ModelField, ModelMeta};
use crate::utils::option_inner;

/// Generates every impl of `#[derive(Model)]`.
pub(crate) fn match_model_impls(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let (meta, data) = derive_data::parse(ast)?;

    let (model_impls, generics) = match &data {
        ModelData::Struct(fields) => {
            let generics = bounded_generics(&meta, fields);
            (struct_kind::impl_struct(&meta, &generics, fields), generics)
        }
        ModelData::Enum(variants) => (enum_kind::impl_enum(&meta, variants), meta.generics.clone()),
    };
    let subclass_impls = subclass::impl_subclass_of(&meta, &generics);
    let auto_register = auto_register::get_auto_register_impl(&meta);

    Ok(quote! {
        #model_impls
        #subclass_impls
        #auto_register
    })
}

/// The input generics plus the bounds member access needs.
///
/// Every type parameter must be `'static` and every member type a model
/// node. Converted members additionally need `ModelType + Default`.
fn bounded_generics(meta: &ModelMeta, fields: &[ModelField]) -> Generics {
    let mut generics = meta.generics.clone();
    if !meta.is_generic() {
        return generics;
    }

    let model_ = crate::path::model_(&meta.hw_model);
    let part_ = crate::path::part_(&meta.hw_model);
    let params: Vec<_> = meta.generics.type_params().map(|param| param.ident.clone()).collect();

    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote!(#param: 'static));
    }
    for field in fields.iter().filter(|field| !field.attrs.skip) {
        let ty = field.ty;
        if field.attrs.is_converted() {
            let inner = option_inner(ty).unwrap_or(ty);
            where_clause
                .predicates
                .push(parse_quote!(#inner: #part_::ModelType + ::core::default::Default));
        } else {
            where_clause.predicates.push(parse_quote!(#ty: #model_));
        }
    }
    generics
}
