//! Complex nodes: types with a [`HookTable`].
//!
//! `#[derive(Model)]` on a struct implements [`Complex`] and forwards the
//! child related [`Model`] methods to the functions below, so the traversal
//! logic lives here once instead of in every expansion.

use super::{ChildFn, ChildKey, ChildMutFn, ModelType, PartFn, PartMutFn};
use crate::Result;
use crate::hook::{HookIndex, HookTable};

/// A struct-like type with named members.
pub trait Complex: ModelType + Sized + 'static {
    fn hook_table() -> &'static HookTable<Self>;
}

#[inline]
pub fn hook_index<T: Complex>() -> &'static HookIndex {
    T::hook_table().index()
}

#[inline]
pub fn child_count<T: Complex>() -> usize {
    T::hook_table().len()
}

pub fn for_each_child<T: Complex>(this: &T, f: &mut ChildFn<'_>) -> Result<()> {
    let table = T::hook_table();
    for (position, hook) in table.index().iter().enumerate() {
        table.visit(position, this, &mut |part| f(ChildKey::Hook(hook), part))?;
    }
    Ok(())
}

pub fn for_each_child_mut<T: Complex>(this: &mut T, f: &mut ChildMutFn<'_>) -> Result<()> {
    let table = T::hook_table();
    for (position, hook) in table.index().iter().enumerate() {
        table.visit_mut(position, this, &mut |part| f(ChildKey::Hook(hook), part))?;
    }
    Ok(())
}

#[inline]
pub fn child_at<T: Complex>(this: &T, index: usize, f: &mut PartFn<'_>) -> Result<()> {
    T::hook_table().visit(index, this, f)
}

#[inline]
pub fn child_at_mut<T: Complex>(this: &mut T, index: usize, f: &mut PartMutFn<'_>) -> Result<()> {
    T::hook_table().visit_mut(index, this, f)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::hook::NameMatch;
    use crate::part::{ChildKey, Conversion, ModelPartType, ModelType};
    use crate::value::{Primitive, PrimitiveKind, PrimitiveKinds};
    use crate::{Error, Model, Result};

    #[derive(Model, Default, Debug, PartialEq)]
    #[model(tag = "sql:table:accounts")]
    struct Account {
        #[model(tag = "sql:pk")]
        id: u32,
        #[model(rename = "Owner")]
        owner: String,
        #[model(rename = "OWNER")]
        owner_code: Option<String>,
        labels: Vec<String>,
        #[model(skip)]
        cache: u8,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Inner {
        x: i64,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Outer {
        inner: Option<Inner>,
    }

    #[derive(Model, Default)]
    struct Wrapper<T> {
        value: T,
    }

    #[derive(Model, Default)]
    struct Pair(u8, String);

    fn names(node: &dyn Model) -> Vec<&'static str> {
        let mut names = Vec::new();
        node.for_each_child(&mut |key, _| {
            if let ChildKey::Hook(hook) = key {
                names.push(hook.name());
            }
            Ok(())
        })
        .unwrap();
        names
    }

    fn read(node: &dyn Model, name: &str, mode: NameMatch) -> Result<Option<Primitive>> {
        let mut value = None;
        node.child(name, mode, &mut |child| {
            value = child.value()?;
            Ok(())
        })?;
        Ok(value)
    }

    #[test]
    fn members_in_declaration_order() {
        let account = Account::default();
        let node: &dyn Model = &account;
        assert_eq!(node.part_type(), ModelPartType::Complex);
        assert_eq!(node.model_name(), "Account");
        assert_eq!(node.child_count(), 4);
        assert_eq!(names(node), ["id", "Owner", "OWNER", "labels"]);
        assert_eq!(node.metadata().value_in("sql", "table"), Some("accounts"));

        let index = Account::static_hook_index().unwrap();
        assert!(index.get(0).unwrap().metadata().has_flag("sql:pk"));
    }

    #[test]
    fn lookup_modes() {
        let account = Account {
            id: 7,
            owner: String::from("ann"),
            owner_code: None,
            ..Account::default()
        };
        let node: &dyn Model = &account;

        assert_eq!(read(node, "Owner", NameMatch::Exact), Ok(Some(Primitive::from("ann"))));
        assert_eq!(read(node, "owner", NameMatch::Exact), Ok(None));
        assert_eq!(read(node, "owner", NameMatch::CaseInsensitive), Ok(Some(Primitive::from("ann"))));
        assert_eq!(read(node, "ID", NameMatch::Folded), Ok(None));
        assert_eq!(read(node, "id", NameMatch::Folded), Ok(Some(Primitive::U32(7))));
    }

    #[test]
    fn ambiguous_names_keep_declaration_order() {
        let account = Account::default();
        let node: &dyn Model = &account;
        let found: Vec<_> = node
            .matches("owner", NameMatch::CaseInsensitive)
            .map(|(position, hook)| (position, hook.name()))
            .collect();
        assert_eq!(found, [(1, "Owner"), (2, "OWNER")]);
        assert_eq!(node.matches("OWNER", NameMatch::Exact).count(), 1);
    }

    #[test]
    fn write_by_name_creates_absent_storage() {
        let mut outer = Outer::default();
        let node: &mut dyn Model = &mut outer;
        let found = node
            .child_mut("inner", NameMatch::Exact, &mut |inner| {
                inner.child_mut("x", NameMatch::Exact, &mut |x| x.set_value(Primitive::I64(5)))?;
                Ok(())
            })
            .unwrap();
        assert!(found);
        assert_eq!(outer.inner, Some(Inner { x: 5 }));
    }

    #[test]
    fn named_lookup_on_simple_node_is_usage_error() {
        let value = 3_u8;
        let node: &dyn Model = &value;
        let err = node.child("x", NameMatch::Exact, &mut |_| Ok(())).unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn generic_and_tuple_structs() {
        let a = Wrapper { value: 1_u8 };
        let b = Wrapper {
            value: String::from("b"),
        };
        assert!(!core::ptr::eq(
            Wrapper::<u8>::static_hook_index().unwrap(),
            Wrapper::<String>::static_hook_index().unwrap()
        ));
        assert_eq!(read(&a, "value", NameMatch::Exact), Ok(Some(Primitive::U8(1))));
        assert_eq!(read(&b, "value", NameMatch::Exact), Ok(Some(Primitive::from("b"))));

        let mut pair = Pair::default();
        let node: &mut dyn Model = &mut pair;
        node.child_mut("1", NameMatch::Exact, &mut |part| part.set_value(Primitive::from("one")))
            .unwrap();
        assert_eq!(pair.1, "one");
        assert_eq!(names(&pair), ["0", "1"]);
    }

    fn load_percent(value: Primitive) -> Result<u8> {
        let text = value.as_str().unwrap_or_default();
        text.trim_end_matches('%')
            .parse()
            .map_err(|_| Error::malformed("not a percentage"))
    }

    fn store_percent(value: &u8) -> Result<Primitive> {
        Ok(Primitive::String(alloc::format!("{value}%")))
    }

    const PERCENT: Conversion<u8> = Conversion::new("percent", PrimitiveKind::String, load_percent, store_percent);

    #[derive(Model, Default)]
    struct Progress {
        #[model(convert(PERCENT))]
        done: u8,
        #[model(convert(PERCENT), no_default_conversion)]
        left: Option<u8>,
    }

    #[test]
    fn converted_members() {
        let mut progress = Progress {
            done: 40,
            left: None,
        };
        assert_eq!(read(&progress, "done", NameMatch::Exact), Ok(Some(Primitive::from("40%"))));
        assert_eq!(read(&progress, "left", NameMatch::Exact), Ok(None));

        let node: &mut dyn Model = &mut progress;
        node.child_mut("left", NameMatch::Exact, &mut |part| part.set_value(Primitive::from("60%")))
            .unwrap();
        let err = node
            .child_mut("left", NameMatch::Exact, &mut |part| part.set_value(Primitive::U8(1)))
            .unwrap_err();
        assert!(matches!(err, Error::NoConversion { .. }));
        assert_eq!(progress.left, Some(60));

        let mut seen = None;
        progress
            .child_at(0, &mut |part| {
                seen = part.get_value(PrimitiveKinds::INTEGERS)?;
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, Some(Primitive::U8(40)));
    }
}
