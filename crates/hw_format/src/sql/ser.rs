use alloc::string::String;
use alloc::vec::Vec;

use hw_model::format::Serializer;
use hw_model::part::{Model, ModelPartType, RootRef};
use hw_model::value::{Primitive, PrimitiveKinds};
use hw_model::{Error, Result};
use log::trace;

use super::{AUTO_FLAG, COLUMN_KEY, IGNORE_FLAG, KEY_FLAG, TABLE_KEY};

/// Column and value bindings for inserting one model as one row.
///
/// Building the statement text is left to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBinding {
    pub table: String,
    pub columns: Vec<String>,
    /// Parallel to `columns`; `None` binds `NULL`.
    pub values: Vec<Option<Primitive>>,
    /// Columns of members tagged `sql:pk`, in declaration order.
    pub key_columns: Vec<String>,
}

impl RowBinding {
    /// Column names with their bound values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Primitive>)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Option::as_ref))
    }

    /// The bound value of `column`.
    pub fn value(&self, column: &str) -> Option<Option<&Primitive>> {
        self.iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}

/// Produces a [`RowBinding`] from a Complex root.
///
/// Simple members become columns named by `sql:column:<name>` or the
/// member name. Members tagged `sql:ignore` or `sql:auto` (generated by the
/// database) are left out, as are members that are not Simple.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertSerializer;

impl Serializer for InsertSerializer {
    type Output = RowBinding;
    const NAME: &'static str = "sql insert";

    fn supports(&self, part_type: ModelPartType) -> bool {
        part_type == ModelPartType::Complex
    }

    fn serialize(self, root: RootRef<'_>) -> Result<RowBinding> {
        let node = root.node();
        let mut binding = RowBinding {
            table: String::from(
                node.metadata()
                    .value(TABLE_KEY)
                    .unwrap_or_else(|| node.model_name()),
            ),
            ..RowBinding::default()
        };

        node.for_each_child(&mut |key, child| {
            let meta = key.metadata();
            let name = key.name().unwrap_or_default();
            if meta.has_flag(IGNORE_FLAG) || meta.has_flag(AUTO_FLAG) {
                return Ok(());
            }
            if child.part_type() != ModelPartType::Simple {
                trace!("member `{name}` of `{}` is not a column", node.model_name());
                return Ok(());
            }

            let column = String::from(meta.value(COLUMN_KEY).unwrap_or(name));
            let value = if child.has_value() {
                child.get_value(PrimitiveKinds::all())?
            } else {
                None
            };
            if meta.has_flag(KEY_FLAG) {
                binding.key_columns.push(column.clone());
            }
            binding.columns.push(column);
            binding.values.push(value);
            Ok(())
        })?;

        Ok(binding)
    }
}

/// Writes a database generated key into the member tagged `sql:auto`.
///
/// Returns `Ok(false)` when `node` has no such member.
///
/// # Errors
///
/// [`Error::UnsuitableGeneratedIdField`] when the member does not hold an
/// integer.
pub fn capture_generated_id(node: &mut dyn Model, id: i64) -> Result<bool> {
    let Some(index) = node.hook_index() else {
        return Ok(false);
    };
    let Some((position, hook)) = index
        .iter()
        .enumerate()
        .find(|(_, hook)| hook.metadata().has_flag(AUTO_FLAG))
    else {
        return Ok(false);
    };

    node.child_at_mut(position, &mut |slot| match slot.value_kind() {
        Some(kind) if kind.is_integer() => slot.set_value(Primitive::I64(id)),
        _ => Err(Error::UnsuitableGeneratedIdField(hook.name())),
    })?;
    Ok(true)
}
