use proc_macro2::TokenStream;
use quote::quote;
use syn::Generics;

use crate::derive_data::ModelMeta;
use crate::path;

/// `SubclassOf<B>` for every `#[model(subclass_of(B))]`.
pub(crate) fn impl_subclass_of(meta: &ModelMeta, generics: &Generics) -> TokenStream {
    let hw_model = &meta.hw_model;
    let part_ = path::part_(hw_model);
    let box_ = path::box_(hw_model);

    let ident = meta.ident;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let exchange_name = match &meta.attrs.exchange_name {
        Some(name) => quote!(::core::option::Option::Some(#name)),
        None => quote!(::core::option::Option::None),
    };

    let impls = meta.attrs.subclass_of.iter().map(|base| {
        quote! {
            impl #impl_generics #part_::SubclassOf<#base> for #ident #ty_generics #where_clause {
                const EXCHANGE_NAME: ::core::option::Option<&'static str> = #exchange_name;

                #[inline]
                fn upcast(self: #box_<Self>) -> #box_<#base> {
                    self
                }
            }
        }
    });

    quote! { #(#impls)* }
}
