use hw_model::format::Deserializer;
use hw_model::hook::NameMatch;
use hw_model::part::{Model, ModelPartType, RootMut};
use hw_model::value::Primitive;
use hw_model::{Error, Result};
use log::trace;

use super::{COLUMN_KEY, IGNORE_FLAG, Row};

/// Populates a model from query results.
///
/// Simple and Complex roots take exactly one row; Sequence roots take one
/// element per row. A Simple target reads the first column of its row.
#[derive(Debug, Clone, Copy)]
pub struct RowDeserializer<'r> {
    rows: &'r [Row],
    name_match: NameMatch,
}

impl<'r> RowDeserializer<'r> {
    /// Column names are matched case-insensitively.
    #[inline]
    pub fn new(rows: &'r [Row]) -> Self {
        Self {
            rows,
            name_match: NameMatch::CaseInsensitive,
        }
    }

    #[inline]
    pub fn name_match(mut self, name_match: NameMatch) -> Self {
        self.name_match = name_match;
        self
    }

    fn single(&self) -> Result<&'r Row> {
        match self.rows {
            [] => Err(Error::NoRows),
            [row] => Ok(row),
            _ => Err(Error::TooManyRows),
        }
    }

    fn row(&self, row: &Row, node: &mut dyn Model) -> Result<()> {
        match node.part_type() {
            ModelPartType::Simple | ModelPartType::Null => {
                let Some(column) = row.columns().first() else {
                    return Err(Error::malformed("row without columns"));
                };
                assign(node, column.value.as_ref())
            }
            ModelPartType::Complex => self.columns(row, node),
            found => Err(Error::UnsupportedModelType {
                context: "sql row",
                found,
            }),
        }
    }

    fn columns(&self, row: &Row, node: &mut dyn Model) -> Result<()> {
        node.create()?;
        for column in row.columns() {
            match column_position(node, &column.name, self.name_match) {
                Some(position) => {
                    node.child_at_mut(position, &mut |slot| assign(slot, column.value.as_ref()))?;
                }
                None => trace!("column `{}` has no member in `{}`", column.name, node.model_name()),
            }
        }
        node.complete()
    }
}

impl Deserializer for RowDeserializer<'_> {
    const NAME: &'static str = "sql";

    fn supports(&self, part_type: ModelPartType) -> bool {
        part_type != ModelPartType::Dictionary
    }

    fn deserialize(self, root: RootMut<'_>) -> Result<()> {
        let node = root.into_node();
        if node.part_type() == ModelPartType::Sequence {
            node.create()?;
            for row in self.rows {
                node.create_element(&mut |element| self.row(row, element))?;
            }
            return node.complete();
        }
        let row = self.single()?;
        self.row(row, node)
    }
}

fn assign(node: &mut dyn Model, value: Option<&Primitive>) -> Result<()> {
    match value {
        Some(value) => node.set_value(value.clone()),
        None => node.set_null(),
    }
}

/// The member bound to `column`: an explicit `sql:column:<name>` tag wins,
/// then a member of that name without an explicit column. Members tagged
/// `sql:ignore` are never bound.
fn column_position(node: &dyn Model, column: &str, name_match: NameMatch) -> Option<usize> {
    let index = node.hook_index()?;
    let tagged = index.iter().position(|hook| {
        let meta = hook.metadata();
        !meta.has_flag(IGNORE_FLAG)
            && meta
                .value(COLUMN_KEY)
                .is_some_and(|name| name.eq_ignore_ascii_case(column))
    });
    tagged.or_else(|| {
        node.matches(column, name_match)
            .find(|(_, hook)| {
                let meta = hook.metadata();
                !meta.has_flag(IGNORE_FLAG) && meta.value(COLUMN_KEY).is_none()
            })
            .map(|(position, _)| position)
    })
}
