use alloc::string::String;
use alloc::vec::Vec;

use hw_model::value::Primitive;

/// One named cell of a result row; `None` is SQL `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub value: Option<Primitive>,
}

impl Column {
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<Primitive>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    #[inline]
    pub fn null(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// A result row as handed over by a database driver.
///
/// # Examples
///
/// ```
/// use hw_format::sql::Row;
///
/// let row = Row::new().with("id", 7_i64).with_null("email");
/// assert_eq!(row.len(), 2);
/// assert!(row.get("email").unwrap().value.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<Column>,
}

impl Row {
    #[inline]
    pub const fn new() -> Self {
        Self { columns: Vec::new() }
    }

    /// Appends a non-null column.
    #[inline]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Primitive>) -> Self {
        self.columns.push(Column::new(name, value));
        self
    }

    /// Appends a `NULL` column.
    #[inline]
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.columns.push(Column::null(name));
        self
    }

    #[inline]
    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The first column named `name`, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<Column> for Row {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
