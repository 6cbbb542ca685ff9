use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hw_utils::TypeIdMap;
use hw_utils::hash::{FixedHashState, HashMap};

use super::NameMap;
use crate::part::{PolyBase, SubclassOf};
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// SubclassRegistry

/// A type erased `fn() -> Box<B>`.
type ErasedFactory = Box<dyn Any + Send + Sync>;

struct BaseEntry {
    base_name: &'static str,
    factories: HashMap<&'static str, ErasedFactory>,
}

/// Factories of every registered subclass, grouped by base.
///
/// ## Example
///
/// ```
/// use core::any::Any;
/// use hw_model::{Model, impl_poly_base};
/// use hw_model::registry::SubclassRegistry;
///
/// trait Shape: Model + Any {}
/// impl_poly_base!(dyn Shape);
///
/// #[derive(Model, Default)]
/// #[model(subclass_of(dyn Shape), exchange_name = "circle")]
/// struct Circle { radius: f64 }
///
/// impl Shape for Circle {}
///
/// let mut registry = SubclassRegistry::empty();
/// assert!(registry.register::<dyn Shape, Circle>());
///
/// let shape = registry.construct::<dyn Shape>("circle").unwrap();
/// assert_eq!(shape.model_name(), "Circle");
/// assert_eq!(registry.to_exchange_name("Circle"), "circle");
/// ```
pub struct SubclassRegistry {
    bases: TypeIdMap<BaseEntry>,
    names: NameMap,
}

impl Default for SubclassRegistry {
    /// See [`SubclassRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SubclassRegistry {
    /// Creates a registry without any registration.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            bases: TypeIdMap::new(),
            names: NameMap::new(),
        }
    }

    /// Creates a registry holding every automatically registered subclass.
    ///
    /// See [`SubclassRegistry::auto_register`].
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.auto_register();
        registry
    }

    /// Runs every registration submitted by `#[model(subclass_of(..))]`.
    ///
    /// Returns `false` when the `auto_register` feature is disabled.
    /// Repeated calls do not insert duplicates.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_all(self);
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Registers `D` as a subclass of `B`.
    ///
    /// Returns `false`, without touching the registry, if a subclass with
    /// the same model name is already registered for `B`.
    pub fn register<B: ?Sized + PolyBase, D: SubclassOf<B>>(&mut self) -> bool {
        let factory: fn() -> Box<B> = || D::upcast(Box::new(D::default()));
        let entry = self.bases.get_or_insert(TypeId::of::<B>(), || BaseEntry {
            base_name: B::BASE_NAME,
            factories: HashMap::with_hasher(FixedHashState),
        });
        if entry.factories.contains_key(D::NAME) {
            log::debug!("`{}` is already registered as a `{}`", D::NAME, B::BASE_NAME);
            return false;
        }
        entry.factories.insert(D::NAME, Box::new(factory));
        if let Some(exchange) = D::EXCHANGE_NAME {
            self.names.insert(D::NAME, exchange);
        }
        log::debug!("registered `{}` as a `{}`", D::NAME, B::BASE_NAME);
        true
    }

    /// Removes the subclass of `B` named `model_name`, together with its
    /// name mapping.
    pub fn unregister<B: ?Sized + PolyBase>(&mut self, model_name: &str) -> bool {
        let Some(entry) = self.bases.get_mut(&TypeId::of::<B>()) else {
            return false;
        };
        if entry.factories.remove(model_name).is_none() {
            return false;
        }
        self.names.remove(model_name);
        true
    }

    /// Whether `model_name` is registered as a subclass of `B`.
    pub fn contains<B: ?Sized + PolyBase>(&self, model_name: &str) -> bool {
        self.bases
            .get_type::<B>()
            .is_some_and(|entry| entry.factories.contains_key(model_name))
    }

    /// Model names of every subclass of `B`, in no particular order.
    pub fn subclasses<B: ?Sized + PolyBase>(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bases
            .get_type::<B>()
            .into_iter()
            .flat_map(|entry| entry.factories.keys().copied())
    }

    /// Maps a model type name to the name written by formats.
    #[inline]
    pub fn map_name(&mut self, model: impl Into<Cow<'static, str>>, exchange: impl Into<Cow<'static, str>>) {
        self.names.insert(model, exchange);
    }

    #[inline]
    pub fn names(&self) -> &NameMap {
        &self.names
    }

    /// The model name of an exchange name; the literal name when unmapped.
    #[inline]
    pub fn to_model_name<'a>(&'a self, exchange: &'a str) -> &'a str {
        self.names.to_model(exchange)
    }

    /// The exchange name of a model name; the literal name when unmapped.
    #[inline]
    pub fn to_exchange_name(&self, model: &'static str) -> Cow<'static, str> {
        self.names.to_exchange_static(model)
    }

    /// Builds a default instance of the subclass of `B` whose exchange name
    /// is `exchange`.
    pub fn construct<B: ?Sized + PolyBase>(&self, exchange: &str) -> Result<Box<B>> {
        let model = self.to_model_name(exchange);
        let factory = self
            .bases
            .get_type::<B>()
            .and_then(|entry| entry.factories.get(model))
            .and_then(|factory| factory.downcast_ref::<fn() -> Box<B>>())
            .ok_or_else(|| Error::UnknownType {
                base: B::BASE_NAME,
                name: String::from(exchange),
            })?;
        Ok(factory())
    }
}

impl core::fmt::Debug for SubclassRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (_, entry) in self.bases.iter() {
            map.entry(&entry.base_name, &entry.factories.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

// -----------------------------------------------------------------------------
// SubclassRegistryArc

/// A shared, lockable [`SubclassRegistry`]. Lock poisoning is ignored.
#[derive(Clone, Default)]
pub struct SubclassRegistryArc {
    pub internal: Arc<RwLock<SubclassRegistry>>,
}

impl SubclassRegistryArc {
    #[inline]
    pub fn new(registry: SubclassRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`SubclassRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, SubclassRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`SubclassRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, SubclassRegistry> {
        self.internal.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for SubclassRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&*self.read(), f)
    }
}

// -----------------------------------------------------------------------------
// Tests
