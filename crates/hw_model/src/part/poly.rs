//! Polymorphic slots.
//!
//! A field typed by a user trait (`Box<dyn Shape>`) is modelled as
//! [`Poly<dyn Shape>`]. The slot is Complex; its members are the members of
//! whatever concrete type it currently holds. On the way out the runtime
//! type is reported through [`Model::type_id_name`], on the way in a format
//! hands the discriminator it read to [`Model::subclass_part`], which builds
//! the matching type from the global [`SubclassRegistry`].
//!
//! [`SubclassRegistry`]: crate::registry::SubclassRegistry

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use super::{ChildFn, ChildMutFn, Model, ModelPartType, ModelType, PartFn, PartMutFn, unsupported};
use crate::hook::HookIndex;
use crate::metadata::Metadata;
use crate::{Error, Result, registry};

// -----------------------------------------------------------------------------
// PolyBase

/// A trait object type usable as the static type of a polymorphic slot.
///
/// Implemented for `dyn Base` by [`impl_poly_base!`](crate::impl_poly_base),
/// where `Base: Model + Any`.
pub trait PolyBase: 'static {
    /// Name of the base trait, used in error messages.
    const BASE_NAME: &'static str;

    /// Model name of the statically declared type, if the base has one.
    ///
    /// An instance of exactly this type is written without a discriminator.
    const DECLARED: Option<&'static str>;

    fn as_model(&self) -> &dyn Model;

    fn as_model_mut(&mut self) -> &mut dyn Model;

    fn as_any(&self) -> &dyn Any;

    /// A default instance of the declared type.
    fn create_declared() -> Option<Box<Self>>;
}

/// Implements [`PolyBase`] for a trait object.
///
/// The trait must have `Model` and `Any` as supertraits. The optional
/// `declared` type is the one created for a slot that is written without a
/// discriminator.
///
/// ## Example
///
/// ```
/// use core::any::Any;
/// use hw_model::{Model, impl_poly_base};
///
/// trait Shape: Model + Any {}
///
/// impl_poly_base!(dyn Shape);
/// ```
#[macro_export]
macro_rules! impl_poly_base {
    (dyn $base:path) => {
        impl $crate::part::PolyBase for dyn $base {
            const BASE_NAME: &'static str = ::core::stringify!($base);
            const DECLARED: ::core::option::Option<&'static str> = ::core::option::Option::None;

            $crate::impl_poly_base!(@casts);

            fn create_declared() -> ::core::option::Option<$crate::__macro_exports::Box<Self>> {
                ::core::option::Option::None
            }
        }
    };
    (dyn $base:path, declared = $declared:ty $(,)?) => {
        impl $crate::part::PolyBase for dyn $base {
            const BASE_NAME: &'static str = ::core::stringify!($base);
            const DECLARED: ::core::option::Option<&'static str> =
                ::core::option::Option::Some(<$declared as $crate::part::ModelType>::NAME);

            $crate::impl_poly_base!(@casts);

            fn create_declared() -> ::core::option::Option<$crate::__macro_exports::Box<Self>> {
                let declared: $crate::__macro_exports::Box<Self> =
                    $crate::__macro_exports::Box::new(<$declared as ::core::default::Default>::default());
                ::core::option::Option::Some(declared)
            }
        }
    };
    (@casts) => {
        #[inline]
        fn as_model(&self) -> &dyn $crate::Model {
            self
        }

        #[inline]
        fn as_model_mut(&mut self) -> &mut dyn $crate::Model {
            self
        }

        #[inline]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }
    };
}

/// A derived type that can fill a [`Poly<B>`] slot.
///
/// Implemented by `#[derive(Model)]` for `#[model(subclass_of(dyn Base))]`.
pub trait SubclassOf<B: ?Sized + PolyBase>: ModelType + Default + 'static {
    /// The discriminator written for this type when it differs from
    /// [`ModelType::NAME`].
    const EXCHANGE_NAME: Option<&'static str> = None;

    fn upcast(self: Box<Self>) -> Box<B>;
}

// -----------------------------------------------------------------------------
// Poly

/// A polymorphic slot holding any registered subclass of `B`, or nothing.
pub struct Poly<B: ?Sized + PolyBase>(Option<Box<B>>);

impl<B: ?Sized + PolyBase> Poly<B> {
    #[inline]
    pub fn new(value: Box<B>) -> Self {
        Self(Some(value))
    }

    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    #[inline]
    pub fn get(&self) -> Option<&B> {
        self.0.as_deref()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut B> {
        self.0.as_deref_mut()
    }

    #[inline]
    pub fn take(&mut self) -> Option<Box<B>> {
        self.0.take()
    }

    /// The contained value as a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.get().and_then(|inner| inner.as_any().downcast_ref::<T>())
    }

    fn declared_name() -> &'static str {
        B::DECLARED.unwrap_or(B::BASE_NAME)
    }

    fn inner_mut(&mut self) -> Result<&mut dyn Model> {
        let inner = match self.0.take() {
            Some(inner) => inner,
            None => B::create_declared().ok_or_else(|| Error::UnknownType {
                base: B::BASE_NAME,
                name: String::from(B::BASE_NAME),
            })?,
        };
        Ok(self.0.insert(inner).as_model_mut())
    }
}

impl<B: ?Sized + PolyBase> Default for Poly<B> {
    #[inline]
    fn default() -> Self {
        Self(None)
    }
}

impl<B: ?Sized + PolyBase> From<Box<B>> for Poly<B> {
    #[inline]
    fn from(value: Box<B>) -> Self {
        Self(Some(value))
    }
}

impl<B: ?Sized + PolyBase> fmt::Debug for Poly<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(inner) => f.debug_tuple("Poly").field(&inner.as_model()).finish(),
            None => f.write_str("Poly(None)"),
        }
    }
}

impl<B: ?Sized + PolyBase> Model for Poly<B> {
    #[inline]
    fn part_type(&self) -> ModelPartType {
        ModelPartType::Complex
    }

    fn model_name(&self) -> &'static str {
        match self.get() {
            Some(inner) => inner.as_model().model_name(),
            None => Self::declared_name(),
        }
    }

    fn has_value(&self) -> bool {
        self.0.is_some()
    }

    fn metadata(&self) -> Metadata {
        self.get()
            .map_or(Metadata::EMPTY, |inner| inner.as_model().metadata())
    }

    fn create(&mut self) -> Result<()> {
        self.inner_mut()?.create()
    }

    fn complete(&mut self) -> Result<()> {
        match self.get_mut() {
            Some(inner) => inner.as_model_mut().complete(),
            None => Ok(()),
        }
    }

    fn hook_index(&self) -> Option<&'static HookIndex> {
        self.get().and_then(|inner| inner.as_model().hook_index())
    }

    fn child_count(&self) -> usize {
        self.get().map_or(0, |inner| inner.as_model().child_count())
    }

    fn for_each_child(&self, f: &mut ChildFn<'_>) -> Result<()> {
        match self.get() {
            Some(inner) => inner.as_model().for_each_child(f),
            None => Ok(()),
        }
    }

    fn for_each_child_mut(&mut self, f: &mut ChildMutFn<'_>) -> Result<()> {
        self.inner_mut()?.for_each_child_mut(f)
    }

    fn child_at(&self, index: usize, f: &mut PartFn<'_>) -> Result<()> {
        match self.get() {
            Some(inner) => inner.as_model().child_at(index, f),
            None => Err(unsupported(B::BASE_NAME, "absent polymorphic slot has no children")),
        }
    }

    fn child_at_mut(&mut self, index: usize, f: &mut PartMutFn<'_>) -> Result<()> {
        self.inner_mut()?.child_at_mut(index, f)
    }

    fn set_null(&mut self) -> Result<()> {
        self.0 = None;
        Ok(())
    }

    #[inline]
    fn is_polymorphic(&self) -> bool {
        true
    }

    fn type_id_name(&self) -> Option<Cow<'static, str>> {
        let name = self.get()?.as_model().model_name();
        if B::DECLARED == Some(name) {
            return None;
        }
        Some(registry::global().read().to_exchange_name(name))
    }

    fn subclass_part(&mut self, name: &str, f: &mut PartMutFn<'_>) -> Result<()> {
        // The guard is a temporary of this statement.
        let created = registry::global().read().construct::<B>(name)?;
        let inner = self.0.insert(created).as_model_mut();
        f(inner)
    }
}

impl<B: ?Sized + PolyBase> ModelType for Poly<B> {
    const PART_TYPE: ModelPartType = ModelPartType::Complex;
    const NAME: &'static str = B::BASE_NAME;
    const POLYMORPHIC: bool = true;
}
