use proc_macro2::TokenStream;
use quote::quote;
use syn::Generics;

use crate::derive_data::{ModelField, ModelMeta};
use crate::path;
use crate::utils::{fold, option_inner};

/// `ModelType`, `Complex` and `Model` for a struct.
pub(crate) fn impl_struct(meta: &ModelMeta, generics: &Generics, fields: &[ModelField]) -> TokenStream {
    let hw_model = &meta.hw_model;
    let model_ = path::model_(hw_model);
    let part_ = path::part_(hw_model);
    let hook_ = path::hook_(hw_model);
    let metadata_ = path::metadata_(hw_model);
    let result_ = path::result_(hw_model);
    let derive_support_ = path::derive_support_(hw_model);

    let ident = meta.ident;
    let name = meta.model_name();
    let type_tags = &meta.attrs.tags;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let hooks = fields
        .iter()
        .filter(|field| !field.attrs.skip)
        .map(|field| impl_hook(meta, field));

    // A `static` in a generic function is shared by all instantiations.
    let table = if meta.is_generic() {
        quote! {
            static CELL: #hook_::GenericHookTableCell = #hook_::GenericHookTableCell::new();
            CELL.get_or_insert::<Self>(|| #hook_::HookTable::new([#(#hooks),*]))
        }
    } else {
        quote! {
            static CELL: #hook_::HookTableCell<#ident> = #hook_::HookTableCell::new();
            CELL.get_or_init(|| #hook_::HookTable::new([#(#hooks),*]))
        }
    };

    quote! {
        impl #impl_generics #part_::ModelType for #ident #ty_generics #where_clause {
            const PART_TYPE: #part_::ModelPartType = #part_::ModelPartType::Complex;
            const NAME: &'static str = #name;

            #[inline]
            fn static_hook_index() -> ::core::option::Option<&'static #hook_::HookIndex> {
                ::core::option::Option::Some(#derive_support_::hook_index::<Self>())
            }

            #[inline]
            fn static_metadata() -> #metadata_ {
                #metadata_::new(&[#(#type_tags),*])
            }
        }

        impl #impl_generics #part_::Complex for #ident #ty_generics #where_clause {
            fn hook_table() -> &'static #hook_::HookTable<Self> {
                #table
            }
        }

        impl #impl_generics #model_ for #ident #ty_generics #where_clause {
            #[inline]
            fn part_type(&self) -> #part_::ModelPartType {
                #part_::ModelPartType::Complex
            }

            #[inline]
            fn model_name(&self) -> &'static str {
                <Self as #part_::ModelType>::NAME
            }

            #[inline]
            fn metadata(&self) -> #metadata_ {
                <Self as #part_::ModelType>::static_metadata()
            }

            #[inline]
            fn hook_index(&self) -> ::core::option::Option<&'static #hook_::HookIndex> {
                ::core::option::Option::Some(#derive_support_::hook_index::<Self>())
            }

            #[inline]
            fn child_count(&self) -> usize {
                #derive_support_::child_count::<Self>()
            }

            fn for_each_child(&self, f: &mut #part_::ChildFn<'_>) -> #result_<()> {
                #derive_support_::for_each_child(self, f)
            }

            fn for_each_child_mut(&mut self, f: &mut #part_::ChildMutFn<'_>) -> #result_<()> {
                #derive_support_::for_each_child_mut(self, f)
            }

            fn child_at(&self, index: usize, f: &mut #part_::PartFn<'_>) -> #result_<()> {
                #derive_support_::child_at(self, index, f)
            }

            fn child_at_mut(&mut self, index: usize, f: &mut #part_::PartMutFn<'_>) -> #result_<()> {
                #derive_support_::child_at_mut(self, index, f)
            }
        }
    }
}

/// One `Hook::new(..)` expression.
fn impl_hook(meta: &ModelMeta, field: &ModelField) -> TokenStream {
    let hw_model = &meta.hw_model;
    let part_ = path::part_(hw_model);
    let hook_ = path::hook_(hw_model);
    let metadata_ = path::metadata_(hw_model);

    let name = field.name();
    let folded = fold(&name);
    let tags = &field.attrs.tags;
    let member = &field.member;

    let (get, get_mut) = if field.attrs.is_converted() {
        let conversions = &field.attrs.convert;
        let default = !field.attrs.no_default_conversion;
        let (new, new_mut) = match option_inner(field.ty) {
            Some(_) => (quote!(optional), quote!(optional_mut)),
            None => (quote!(new), quote!(new_mut)),
        };
        (
            quote! {
                |this, f| f(&#part_::Converted::#new(&this.#member, &[#(#conversions),*], #default))
            },
            quote! {
                |this, f| f(&mut #part_::Converted::#new_mut(&mut this.#member, &[#(#conversions),*], #default))
            },
        )
    } else {
        (
            quote! { |this, f| f(&this.#member) },
            quote! { |this, f| f(&mut this.#member) },
        )
    };

    quote! {
        #hook_::Hook::<Self>::new(
            #hook_::HookInfo::new(#name, #folded, #metadata_::new(&[#(#tags),*])),
            #get,
            #get_mut,
        )
    }
}
