use proc_macro2::TokenStream;

use crate::derive_data::ModelMeta;

/// Submits a function registering the type under each of its bases.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &ModelMeta) -> TokenStream {
    use quote::quote;

    // Generic types cannot be registered without knowing their arguments.
    if meta.attrs.subclass_of.is_empty() || meta.is_generic() {
        return crate::utils::empty();
    }

    let registry_ = crate::path::registry_(&meta.hw_model);
    let auto_register_ = crate::path::auto_register_(&meta.hw_model);
    let ident = meta.ident;
    let bases = &meta.attrs.subclass_of;

    quote! {
        const _: () = {
            fn __register(registry: &mut #registry_::SubclassRegistry) {
                #(registry.register::<#bases, #ident>();)*
            }

            #auto_register_::inventory::submit! {
                #auto_register_::__AutoRegisterFunc(__register)
            }
        };
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ModelMeta) -> TokenStream {
    crate::utils::empty()
}
