use proc_macro2::TokenStream;
use syn::{GenericArgument, PathArguments, Type};

#[inline(always)]
pub(crate) fn empty() -> TokenStream {
    TokenStream::new()
}

/// `name` with ASCII letters lowercased, as stored in `HookInfo::folded`.
#[inline]
pub(crate) fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// The `T` of a field written as `Option<T>`.
///
/// Detection is syntactic: aliases of `Option` are not recognised.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let last = path.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}
