//! See [`Model`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static MODEL_ATTRIBUTE_NAME: &str = "model";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Model Derivation
///
/// `#[derive(Model)]` turns a type into a node of the model graph.
///
/// - Structs (named or tuple fields) become Complex nodes and implement
///   `ModelType`, `Complex` and `Model`. Every field is a member, in
///   declaration order, and must itself be a model node.
/// - Fieldless enums become Simple nodes and implement `ModelEnum`,
///   `ModelType` and `Model`. They exchange their symbol name, or their
///   discriminant when a format has no strings.
///
/// Unions and types with lifetime parameters are rejected. Generic structs
/// get `'static` bounds on their type parameters and `Model` bounds on their
/// member types.
///
/// ## Type attributes
///
/// ```rust, ignore
/// #[derive(Model, Default)]
/// #[model(name = "circle_shape", tag = "sql:table:circles")]
/// #[model(subclass_of(dyn Shape), exchange_name = "circle")]
/// struct Circle { radius: f64 }
/// ```
///
/// - `name`: the model name, the type ident by default.
/// - `tag`: a metadata tag, repeatable.
/// - `subclass_of(dyn Base)`: implements `SubclassOf<dyn Base>`, so the type
///   can fill a `Poly<dyn Base>` slot. `Base` must be implemented by hand and
///   the type must implement `Default`. With the `auto_register` feature,
///   non-generic types are also registered in the global subclass registry.
///   Repeatable.
/// - `exchange_name`: the discriminator formats write for the type.
///
/// ## Field attributes
///
/// ```rust, ignore
/// #[derive(Model, Default)]
/// struct User {
///     #[model(rename = "Id", tag = "sql:pk", tag = "sql:auto")]
///     id: i64,
///     #[model(convert(AS_UNIX_SECONDS))]
///     created: NaiveDateTime,
///     #[model(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// - `rename`: the member name.
/// - `tag`: a metadata tag, repeatable.
/// - `skip`: the field is not a member.
/// - `convert(A, B)`: `Conversion` constants tried in order before the
///   field's own value access. Fields written as `Option<T>` are detected
///   syntactically and stay nullable.
/// - `no_default_conversion`: fail instead of falling back to the field's
///   own value access.
///
/// ## Variant attributes
///
/// - `rename`: the symbol name.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match impls::match_model_impls(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
