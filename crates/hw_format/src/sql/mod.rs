//! Result rows into models, models into insert bindings.
//!
//! Nothing here talks to a database or writes SQL text. A driver hands over
//! [`Row`]s and receives [`RowBinding`]s.
//!
//! Member tags:
//!
//! | tag                 | effect                                         |
//! |---------------------|------------------------------------------------|
//! | `sql:table:<name>`  | table name (type level), defaults to the model name |
//! | `sql:column:<name>` | column name, defaults to the member name       |
//! | `sql:pk`            | listed in [`RowBinding::key_columns`]          |
//! | `sql:auto`          | generated by the database; not inserted, see [`capture_generated_id`] |
//! | `sql:ignore`        | neither read nor written                       |
//!
//! # Examples
//!
//! ```
//! use hw_model::Model;
//! use hw_format::sql::{self, Row};
//!
//! #[derive(Model, Default, Debug)]
//! #[model(tag = "sql:table:users")]
//! struct User {
//!     #[model(tag = "sql:pk", tag = "sql:auto")]
//!     id: i64,
//!     #[model(tag = "sql:column:user_name")]
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! let mut user: User = sql::fetch_one(&[Row::new()
//!     .with("ID", 1_i64)
//!     .with("user_name", "ann")
//!     .with_null("email")])
//! .unwrap();
//! assert_eq!((user.id, user.name.as_str(), user.email.as_deref()), (1, "ann", None));
//!
//! let binding = sql::insert_binding(&user).unwrap();
//! assert_eq!(binding.table, "users");
//! assert_eq!(binding.columns, ["user_name", "email"]);
//!
//! assert!(sql::capture_generated_id(&mut user, 42).unwrap());
//! assert_eq!(user.id, 42);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod de;
mod row;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::RowDeserializer;
pub use row::{Column, Row};
pub use ser::{InsertSerializer, RowBinding, capture_generated_id};

use alloc::vec::Vec;

use hw_model::format;
use hw_model::part::{Model, ModelType};
use hw_model::Result;

const TABLE_KEY: &str = "sql:table";
const COLUMN_KEY: &str = "sql:column";
const KEY_FLAG: &str = "sql:pk";
const AUTO_FLAG: &str = "sql:auto";
const IGNORE_FLAG: &str = "sql:ignore";

// -----------------------------------------------------------------------------
// Shortcuts

/// Builds a `T` from exactly one row.
///
/// # Errors
///
/// [`hw_model::Error::NoRows`] or [`hw_model::Error::TooManyRows`] when
/// `rows` does not hold exactly one row.
#[inline]
pub fn fetch_one<T: ModelType + Default>(rows: &[Row]) -> Result<T> {
    format::deserialize_any::<T, _>(RowDeserializer::new(rows))
}

/// Like [`fetch_one`], but no rows is `Ok(None)`.
pub fn fetch_optional<T: ModelType + Default>(rows: &[Row]) -> Result<Option<T>> {
    match fetch_one(rows) {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Builds one `T` per row.
#[inline]
pub fn fetch_all<T: ModelType + Default>(rows: &[Row]) -> Result<Vec<T>> {
    format::deserialize_any::<Vec<T>, _>(RowDeserializer::new(rows))
}

/// Binds the Simple members of `value` for an insert.
#[inline]
pub fn insert_binding(value: &dyn Model) -> Result<RowBinding> {
    format::serialize_any(InsertSerializer, value)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;

    use chrono::NaiveDate;
    use hw_model::hook::NameMatch;
    use hw_model::part::ModelPartType;
    use hw_model::value::Primitive;
    use hw_model::{Error, Model};

    use super::*;

    #[derive(Model, Default, Debug, PartialEq, Clone, Copy)]
    enum Status {
        #[default]
        Active,
        Banned,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    #[model(tag = "sql:table:accounts")]
    struct Account {
        #[model(tag = "sql:pk", tag = "sql:auto")]
        id: i64,
        #[model(tag = "sql:pk")]
        region: String,
        #[model(rename = "Name", tag = "sql:column:display_name")]
        name: String,
        status: Status,
        born: Option<NaiveDate>,
        #[model(tag = "sql:ignore")]
        cache: u32,
        tags: Vec<String>,
    }

    fn account_row(id: i64, name: &str) -> Row {
        Row::new()
            .with("id", id)
            .with("REGION", "eu")
            .with("display_name", name)
            .with("status", "Banned")
            .with_null("born")
            .with("cache", 9_u32)
            .with("last_login", "yesterday")
    }

    #[test]
    fn cardinality() {
        assert_eq!(fetch_one::<Account>(&[]).unwrap_err(), Error::NoRows);
        assert_eq!(
            fetch_one::<Account>(&[account_row(1, "a"), account_row(2, "b")]).unwrap_err(),
            Error::TooManyRows
        );
        assert_eq!(fetch_optional::<Account>(&[]).unwrap(), None);
        assert_eq!(fetch_one::<i64>(&[]).unwrap_err(), Error::NoRows);
        assert!(fetch_all::<Account>(&[]).unwrap().is_empty());
    }

    #[test]
    fn columns_to_members() {
        let account: Account = fetch_one(&[account_row(5, "Ann")]).unwrap();
        assert_eq!(
            account,
            Account {
                id: 5,
                region: String::from("eu"),
                name: String::from("Ann"),
                status: Status::Banned,
                born: None,
                cache: 0,
                tags: vec![],
            }
        );

        // The member name does not bind once a column name is given.
        let row = Row::new().with("Name", "ignored").with("born", "1990-04-01");
        let account: Account = fetch_one(&[row]).unwrap();
        assert_eq!(account.name, "");
        assert_eq!(account.born, NaiveDate::from_ymd_opt(1990, 4, 1));

        let rows = [account_row(1, "x")];
        let exact = RowDeserializer::new(&rows).name_match(NameMatch::Exact);
        let mut account = Account::default();
        format::deserialize_into(exact, &mut account).unwrap();
        assert_eq!(account.region, "");
    }

    #[test]
    fn scalar_and_sequence_roots() {
        let rows = [Row::new().with("count", 3_i64).with("extra", true)];
        assert_eq!(fetch_one::<u8>(&rows).unwrap(), 3);
        assert_eq!(fetch_optional::<Option<String>>(&[Row::new().with_null("x")]).unwrap(), Some(None));

        let all: Vec<Account> = fetch_all(&[account_row(1, "a"), account_row(2, "b")]).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name, "b");

        let ids: Vec<i64> = fetch_all(&[Row::new().with("id", 1_i64), Row::new().with("id", 2_i64)]).unwrap();
        assert_eq!(ids, [1, 2]);

        assert!(matches!(fetch_one::<u8>(&[Row::new()]), Err(Error::Malformed(_))));
        assert_eq!(
            fetch_one::<BTreeMap<String, i32>>(&rows).unwrap_err(),
            Error::UnsupportedModelType {
                context: "sql",
                found: ModelPartType::Dictionary
            }
        );
    }

    #[test]
    fn null_into_required_member() {
        let row = Row::new().with_null("display_name");
        assert!(matches!(fetch_one::<Account>(&[row]), Err(Error::NoConversion { .. })));
    }

    #[test]
    fn insert_binding_layout() {
        let account = Account {
            id: 77,
            region: String::from("us"),
            name: String::from("Bo"),
            status: Status::Active,
            born: NaiveDate::from_ymd_opt(2001, 2, 3),
            cache: 4,
            tags: vec![String::from("x")],
        };
        let binding = insert_binding(&account).unwrap();
        assert_eq!(binding.table, "accounts");
        assert_eq!(binding.columns, ["region", "display_name", "status", "born"]);
        assert_eq!(binding.key_columns, ["region"]);
        assert_eq!(binding.value("status"), Some(Some(&Primitive::from("Active"))));
        assert_eq!(
            binding.value("born"),
            Some(Some(&Primitive::Date(NaiveDate::from_ymd_opt(2001, 2, 3).unwrap())))
        );
        assert_eq!(binding.value("id"), None);

        let unborn = Account { born: None, ..account };
        assert_eq!(insert_binding(&unborn).unwrap().value("born"), Some(None));
        assert!(matches!(
            insert_binding(&vec![1_u8]),
            Err(Error::UnsupportedModelType { .. })
        ));
    }

    #[test]
    fn generated_ids() {
        let mut account = Account::default();
        assert!(capture_generated_id(&mut account, 12).unwrap());
        assert_eq!(account.id, 12);

        #[derive(Model, Default)]
        struct Keyless {
            id: i64,
        }
        assert!(!capture_generated_id(&mut Keyless::default(), 1).unwrap());

        #[derive(Model, Default)]
        struct TextKey {
            #[model(tag = "sql:auto")]
            code: String,
        }
        assert_eq!(
            capture_generated_id(&mut TextKey::default(), 1).unwrap_err(),
            Error::UnsuitableGeneratedIdField("code")
        );

        #[derive(Model, Default)]
        struct SmallKey {
            #[model(tag = "sql:auto")]
            id: Option<u8>,
        }
        let mut small = SmallKey::default();
        assert!(matches!(capture_generated_id(&mut small, 300), Err(Error::OutOfRange { .. })));
        assert!(capture_generated_id(&mut small, 200).unwrap());
        assert_eq!(small.id, Some(200));
    }
}
