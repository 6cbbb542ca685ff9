//! JSON through `serde_json`.
//!
//! Members become object keys in declaration order, absent values become
//! `null`, and a polymorphic member whose runtime type differs from its
//! declared type starts with a `"$type"` key.

use alloc::string::{String, ToString};

use hw_model::format::{self, Deserializer, Serializer};
use hw_model::hook::NameMatch;
use hw_model::part::{Model, ModelType, RootMut, RootRef};
use hw_model::{Error, Result};
use serde_core::de::DeserializeSeed;

use crate::UnknownFields;
use crate::serde::{ModelSeed, ModelSerialize, SerdeContext};

/// Reader settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    pub unknown_fields: UnknownFields,
    pub name_match: NameMatch,
}

impl JsonOptions {
    /// Case-insensitive member names, unknown members skipped.
    pub const LENIENT: Self = Self {
        unknown_fields: UnknownFields::Ignore,
        name_match: NameMatch::CaseInsensitive,
    };
}

// -----------------------------------------------------------------------------
// JsonSerializer

/// Writes a model as a JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    #[inline]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output.
    #[inline]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    type Output = String;
    const NAME: &'static str = "json";

    fn serialize(self, root: RootRef<'_>) -> Result<String> {
        let ctx = SerdeContext::new();
        let value = ModelSerialize::new(root.node(), &ctx);
        let output = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        output.map_err(|err| ctx.resolve(err))
    }
}

// -----------------------------------------------------------------------------
// JsonDeserializer

/// Populates a model from a JSON document.
#[derive(Debug, Clone, Copy)]
pub struct JsonDeserializer<'s> {
    input: &'s str,
    options: JsonOptions,
}

impl<'s> JsonDeserializer<'s> {
    #[inline]
    pub fn new(input: &'s str) -> Self {
        Self::with_options(input, JsonOptions::default())
    }

    #[inline]
    pub fn with_options(input: &'s str, options: JsonOptions) -> Self {
        Self { input, options }
    }
}

impl Deserializer for JsonDeserializer<'_> {
    const NAME: &'static str = "json";

    fn deserialize(self, root: RootMut<'_>) -> Result<()> {
        let ctx = SerdeContext::with_options(self.options.name_match, self.options.unknown_fields);
        let mut de = serde_json::Deserializer::from_str(self.input);
        ModelSeed::new(root.into_node(), &ctx)
            .deserialize(&mut de)
            .map_err(|err| ctx.resolve(err))?;
        de.end().map_err(|err| Error::malformed(err.to_string()))
    }
}

// -----------------------------------------------------------------------------
// Shortcuts

/// Serializes `value` as compact JSON.
#[inline]
pub fn to_string(value: &dyn Model) -> Result<String> {
    format::serialize_any(JsonSerializer::new(), value)
}

/// Serializes `value` as indented JSON.
#[inline]
pub fn to_string_pretty(value: &dyn Model) -> Result<String> {
    format::serialize_any(JsonSerializer::pretty(), value)
}

/// Builds a `T` from JSON with the default options.
#[inline]
pub fn from_str<T: ModelType + Default>(input: &str) -> Result<T> {
    format::deserialize_any::<T, _>(JsonDeserializer::new(input))
}

/// Populates an existing value from JSON.
#[inline]
pub fn from_str_into(input: &str, value: &mut dyn Model, options: JsonOptions) -> Result<()> {
    format::deserialize_into(JsonDeserializer::with_options(input, options), value)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use hw_model::Model;
    use hw_model::part::Blob;

    use super::*;

    #[derive(Model, Default, Debug, PartialEq, Clone, Copy)]
    enum Tier {
        #[default]
        Free,
        #[model(rename = "pro")]
        Pro,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Address {
        city: String,
        zip: Option<String>,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Customer {
        #[model(rename = "Id")]
        id: u64,
        name: String,
        tier: Tier,
        address: Option<Address>,
        tags: Vec<String>,
        limits: BTreeMap<String, i32>,
        avatar: Blob,
        balance: f64,
    }

    fn sample() -> Customer {
        Customer {
            id: u64::MAX,
            name: String::from("Ada \"the first\""),
            tier: Tier::Pro,
            address: Some(Address {
                city: String::from("London"),
                zip: None,
            }),
            tags: vec![String::from("a"), String::from("b")],
            limits: BTreeMap::from([(String::from("daily"), -5), (String::from("weekly"), 40)]),
            avatar: Blob(vec![0xde, 0xad]),
            balance: -0.0,
        }
    }

    #[test]
    fn writes_members_in_declaration_order() {
        let json = to_string(&sample()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"Id":18446744073709551615,"name":"Ada \"the first\"","tier":"pro","#,
                r#""address":{"city":"London","zip":null},"tags":["a","b"],"#,
                r#""limits":{"daily":-5,"weekly":40},"avatar":"dead","balance":-0.0}"#,
            )
        );
    }

    #[test]
    fn round_trip() {
        let customer = sample();
        let back: Customer = from_str(&to_string(&customer).unwrap()).unwrap();
        assert_eq!(back, customer);
        assert!(back.balance.is_sign_negative());

        let pretty = to_string_pretty(&customer).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(from_str::<Customer>(&pretty).unwrap(), customer);
    }

    #[test]
    fn absent_stays_absent() {
        let customer = Customer::default();
        let json = to_string(&customer).unwrap();
        assert!(json.contains(r#""address":null"#));
        let back: Customer = from_str(&json).unwrap();
        assert_eq!(back.address, None);
        assert_eq!(to_string(&back).unwrap(), json);
    }

    #[test]
    fn integer_bounds() {
        let err = from_str::<Customer>(r#"{"Id": -1}"#).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));

        #[derive(Model, Default, Debug, PartialEq)]
        struct Small {
            byte: i8,
        }
        assert_eq!(from_str::<Small>(r#"{"byte": -128}"#).unwrap(), Small { byte: -128 });
        assert!(matches!(
            from_str::<Small>(r#"{"byte": 128}"#).unwrap_err(),
            Error::OutOfRange { .. }
        ));
    }

    #[test]
    fn non_finite_floats() {
        #[derive(Model, Default, Debug)]
        struct Reading {
            peak: Option<f64>,
            mean: f64,
            scale: f32,
        }

        let reading = Reading {
            peak: Some(f64::INFINITY),
            mean: f64::NAN,
            scale: f32::NEG_INFINITY,
        };
        let json = to_string(&reading).unwrap();
        assert_eq!(json, r#"{"peak":"inf","mean":"NaN","scale":"-inf"}"#);

        let back: Reading = from_str(&json).unwrap();
        assert_eq!(back.peak, Some(f64::INFINITY));
        assert!(back.mean.is_nan());
        assert_eq!(back.scale, f32::NEG_INFINITY);

        let absent: Reading = from_str(r#"{"peak":null}"#).unwrap();
        assert_eq!(absent.peak, None);
    }

    #[test]
    fn unknown_members() {
        let input = r#"{"id": 7, "nickname": "x", "NAME": "Bob"}"#;
        let err = from_str::<Customer>(input).unwrap_err();
        assert_eq!(
            err,
            Error::IncorrectElementName {
                owner: "Customer",
                name: String::from("id")
            }
        );

        let mut customer = Customer::default();
        from_str_into(input, &mut customer, JsonOptions::LENIENT).unwrap();
        assert_eq!(customer.id, 7);
        assert_eq!(customer.name, "Bob");
    }

    #[test]
    fn typed_errors_survive_serde() {
        let err = from_str::<Customer>(r#"{"tier": "gold"}"#).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidEnumSymbol {
                enum_name: "Tier",
                symbol: String::from("gold")
            }
        );

        let err = from_str::<Customer>(r#"{"name": null}"#).unwrap_err();
        assert!(matches!(err, Error::NoConversion { .. }));
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(from_str::<Customer>("{"), Err(Error::Malformed(_))));
        assert!(matches!(from_str::<Customer>("{} {}"), Err(Error::Malformed(_))));
        assert!(matches!(from_str::<Customer>(r#"{"tags": 5}"#), Err(Error::Malformed(_))));
    }

    #[test]
    fn failed_element_leaves_sequence_unchanged() {
        let mut customer = Customer::default();
        let err = from_str_into(r#"{"tags": ["a", 1, {}]}"#, &mut customer, JsonOptions::default());
        assert!(err.is_err());
        assert_eq!(customer.tags, ["a", "1"]);
    }
}
