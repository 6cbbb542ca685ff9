use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ModelMeta, ModelVariant};
use crate::path;

/// `ModelEnum`, `ModelType` and `Model` for a fieldless enum.
pub(crate) fn impl_enum(meta: &ModelMeta, variants: &[ModelVariant]) -> TokenStream {
    let hw_model = &meta.hw_model;
    let model_ = path::model_(hw_model);
    let part_ = path::part_(hw_model);
    let value_ = path::value_(hw_model);
    let metadata_ = path::metadata_(hw_model);
    let result_ = path::result_(hw_model);
    let derive_support_ = path::derive_support_(hw_model);

    let ident = meta.ident;
    let name = meta.model_name();
    let type_tags = &meta.attrs.tags;

    let idents: Vec<_> = variants.iter().map(|variant| variant.ident).collect();
    let names: Vec<_> = variants.iter().map(ModelVariant::name).collect();
    let indices: Vec<usize> = (0..variants.len()).collect();

    quote! {
        impl #part_::ModelEnum for #ident {
            const SYMBOLS: &'static [#part_::EnumSymbol] = &[
                #(#part_::EnumSymbol::new(#names, #ident::#idents as i64)),*
            ];

            fn symbol_index(&self) -> usize {
                match *self {
                    #(#ident::#idents => #indices,)*
                }
            }

            fn from_symbol_index(index: usize) -> ::core::option::Option<Self> {
                match index {
                    #(#indices => ::core::option::Option::Some(#ident::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #part_::ModelType for #ident {
            const PART_TYPE: #part_::ModelPartType = #part_::ModelPartType::Simple;
            const NAME: &'static str = #name;
            const VALUE_KIND: ::core::option::Option<#value_::PrimitiveKind> =
                ::core::option::Option::Some(#value_::PrimitiveKind::String);

            #[inline]
            fn static_metadata() -> #metadata_ {
                #metadata_::new(&[#(#type_tags),*])
            }
        }

        impl #model_ for #ident {
            #[inline]
            fn part_type(&self) -> #part_::ModelPartType {
                #part_::ModelPartType::Simple
            }

            #[inline]
            fn model_name(&self) -> &'static str {
                <Self as #part_::ModelType>::NAME
            }

            #[inline]
            fn value_kind(&self) -> ::core::option::Option<#value_::PrimitiveKind> {
                <Self as #part_::ModelType>::VALUE_KIND
            }

            #[inline]
            fn metadata(&self) -> #metadata_ {
                <Self as #part_::ModelType>::static_metadata()
            }

            fn get_value(
                &self,
                accepts: #value_::PrimitiveKinds,
            ) -> #result_<::core::option::Option<#value_::Primitive>> {
                #derive_support_::enum_get_value(self, accepts)
            }

            fn set_value(&mut self, value: #value_::Primitive) -> #result_<()> {
                #derive_support_::enum_set_value(self, value)
            }
        }
    }
}
