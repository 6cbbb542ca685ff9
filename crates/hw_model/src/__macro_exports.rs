//! Items used by macro expansions. Not public API.

pub use alloc::boxed::Box;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::registry::SubclassRegistry;

    pub use inventory;

    /// A registration function submitted by `#[model(subclass_of(..))]`.
    pub struct __AutoRegisterFunc(pub fn(&mut SubclassRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub(crate) fn __register_all(registry: &mut SubclassRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
