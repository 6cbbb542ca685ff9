//! Paths into `hw_model` used by the generated code.
//!
//! Everything the expansions name goes through here, so a change of the
//! `hw_model` layout only touches this file.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `hw_model` crate.
///
/// 1. For crates that depend on `hw_model`, `::hw_model` is returned.
/// 2. For crates that depend on `hookwire`, `::hookwire::model` is returned.
/// 3. Otherwise `::hw_model` is returned, which resolves inside `hw_model`
///    itself through its `extern crate self as hw_model`.
///
/// Reading the manifest is not free, so the path is resolved once per
/// expansion and passed around.
pub(crate) fn hw_model() -> syn::Path {
    hw_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("hw_model"))
}

#[inline(always)]
pub(crate) fn model_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::Model }
}

#[inline(always)]
pub(crate) fn part_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::part }
}

#[inline(always)]
pub(crate) fn derive_support_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::part::derive_support }
}

#[inline(always)]
pub(crate) fn hook_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::hook }
}

#[inline(always)]
pub(crate) fn metadata_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::metadata::Metadata }
}

#[inline(always)]
pub(crate) fn value_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::value }
}

#[inline(always)]
pub(crate) fn result_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::Result }
}

#[inline(always)]
pub(crate) fn registry_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::registry }
}

#[inline(always)]
pub(crate) fn box_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::__macro_exports::Box }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(hw_model: &syn::Path) -> TokenStream {
    quote! { #hw_model::__macro_exports::auto_register }
}
