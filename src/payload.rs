//! The payload boundary: parsing and validating generated implementor
//! payloads.
//!
//! The documentation generator emits the implementor data as a JSON
//! object mapping each library identifier to an ordered array of
//! pre-rendered markup strings:
//!
//! ```json
//! {
//!     "libA": ["<code>TypeOne</code>", "<code>TypeTwo</code>"],
//!     "libB": []
//! }
//! ```
//!
//! The registry itself forwards whatever table it is given without
//! looking inside; this module is where shape enforcement lives, so that
//! a malformed payload becomes a reported [`PayloadError`] at load time
//! instead of a silent miscount at render time.
//!
//! Three entry points share the validation:
//!
//! - [`ImplementorTable::from_str`](core::str::FromStr) parses payload
//!   text. It goes through the table's [`Deserialize`] impl, which also
//!   rejects duplicate library keys (a plain [`serde_json::Value`] would
//!   silently collapse them).
//! - [`TryFrom<serde_json::Value>`] converts a payload that has already
//!   been parsed into a JSON value.
//! - [`Serialize`] and [`Display`](core::fmt::Display) emit the payload
//!   shape back out, for producers.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, str::FromStr};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
};
use serde_json::Value as JsonValue;

use crate::table::{ImplementorEntry, ImplementorTable};

/// Errors arising from a payload that does not match the documented
/// shape.
///
/// These surface only at the loading boundary; the registry operations
/// themselves are infallible.
#[derive(Debug)]
pub enum PayloadError {
    /// The payload text was rejected by the JSON deserializer, either as
    /// invalid JSON or as a value of the wrong shape.
    MalformedJson(serde_json::Error),
    /// The top-level JSON value was not an object.
    ExpectedObject {
        /// The JSON type that was found instead.
        actual: &'static str,
    },
    /// The value under a library key was not an array.
    ExpectedArray {
        /// The library key whose value had the wrong type.
        library: String,
        /// The JSON type that was found instead.
        actual: &'static str,
    },
    /// An element of a library's implementor array was not a string.
    ExpectedString {
        /// The library key whose array held the offending element.
        library: String,
        /// The position of the offending element.
        index: usize,
        /// The JSON type that was found instead.
        actual: &'static str,
    },
    /// The same library key appeared more than once in the payload.
    DuplicateLibrary {
        /// The repeated library key.
        library: String,
    },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::MalformedJson(error) => {
                write!(f, "malformed implementor payload: {error}")
            }
            PayloadError::ExpectedObject { actual } => {
                write!(f, "expected payload to be an object, found {actual}")
            }
            PayloadError::ExpectedArray { library, actual } => {
                write!(f, "expected an array of implementors for {library:?}, found {actual}")
            }
            PayloadError::ExpectedString {
                library,
                index,
                actual,
            } => {
                write!(
                    f,
                    "expected implementor {index} of {library:?} to be a string, found {actual}"
                )
            }
            PayloadError::DuplicateLibrary { library } => {
                write!(f, "duplicate library key {library:?} in payload")
            }
        }
    }
}

impl core::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            PayloadError::MalformedJson(error) => Some(error),
            _ => None,
        }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

impl ImplementorTable {
    /// Converts an already-parsed JSON object into a table, validating
    /// the shape of every value.
    ///
    /// Element order within each array is preserved verbatim. Key order
    /// follows the iteration order of `object`, which for `serde_json`'s
    /// default `Map` is sorted; parse with
    /// [`from_str`](core::str::FromStr) when the producer's key order
    /// must survive. A [`serde_json::Map`] also cannot hold duplicate
    /// keys, so the duplicate check only applies on the text path; see
    /// the [module docs](self).
    pub fn from_json_object(
        object: serde_json::Map<String, JsonValue>,
    ) -> Result<Self, PayloadError> {
        let mut table = ImplementorTable::new();
        for (library, value) in object {
            let elements = match value {
                JsonValue::Array(elements) => elements,
                other => {
                    return Err(PayloadError::ExpectedArray {
                        actual: json_type_name(&other),
                        library,
                    });
                }
            };
            let mut implementors = Vec::with_capacity(elements.len());
            for (index, element) in elements.into_iter().enumerate() {
                match element {
                    JsonValue::String(markup) => implementors.push(markup),
                    other => {
                        return Err(PayloadError::ExpectedString {
                            actual: json_type_name(&other),
                            library,
                            index,
                        });
                    }
                }
            }
            table.insert(ImplementorEntry::new(library, implementors));
        }
        Ok(table)
    }
}

/// # Example
///
/// ```
/// use implementors::ImplementorTable;
/// use serde_json::json;
///
/// let payload = json!({
///     "libA": ["implA1", "implA2"],
///     "libB": []
/// });
///
/// let table: ImplementorTable = payload.try_into().unwrap();
/// assert_eq!(table.get("libA").map(<[_]>::len), Some(2));
/// assert_eq!(table.get("libB"), Some(&[][..]));
/// ```
impl TryFrom<JsonValue> for ImplementorTable {
    type Error = PayloadError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Object(object) => ImplementorTable::from_json_object(object),
            other => Err(PayloadError::ExpectedObject {
                actual: json_type_name(&other),
            }),
        }
    }
}

/// # Example
///
/// ```
/// use std::str::FromStr;
///
/// use implementors::ImplementorTable;
///
/// let payload = r#"{
///     "libA": ["implA1", "implA2"],
///     "libB": ["implB1"]
/// }"#;
///
/// let table = ImplementorTable::from_str(payload).unwrap();
/// assert_eq!(table.keys().collect::<Vec<_>>(), ["libA", "libB"]);
/// ```
impl FromStr for ImplementorTable {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(PayloadError::MalformedJson)
    }
}

impl Serialize for ImplementorTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (library, implementors) in self.iter() {
            map.serialize_entry(library, implementors)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ImplementorTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = ImplementorTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of library identifiers to arrays of implementor strings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = ImplementorTable::new();
                while let Some(library) = map.next_key::<String>()? {
                    if table.contains_key(&library) {
                        return Err(de::Error::custom(
                            PayloadError::DuplicateLibrary { library }.to_string(),
                        ));
                    }
                    let implementors = map.next_value::<Vec<String>>()?;
                    table.insert(ImplementorEntry::new(library, implementors));
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

impl fmt::Display for ImplementorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        serde_json::to_string(self)
            .map_err(|_| fmt::Error)
            .and_then(|s| f.write_str(&s))
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};
    use core::str::FromStr;

    use serde_json::json;

    use super::*;

    #[test]
    fn parses_the_documented_shape() {
        let payload = r#"{"libA": ["x"], "libB": ["y", "z"], "libC": []}"#;

        let table = ImplementorTable::from_str(payload).unwrap();
        let keys: Vec<_> = table.keys().collect();
        assert_eq!(keys, ["libA", "libB", "libC"]);
        assert_eq!(table.get("libB"), Some(&["y".to_string(), "z".to_string()][..]));
        assert_eq!(table.get("libC"), Some(&[][..]));
    }

    #[test]
    fn parses_the_empty_payload() {
        let table = ImplementorTable::from_str("{}").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            ImplementorTable::from_str(r#"{"libA": ["#),
            Err(PayloadError::MalformedJson(_))
        ));
    }

    #[test]
    fn rejects_a_non_object_payload() {
        let result: Result<ImplementorTable, _> = json!(["libA"]).try_into();
        assert!(matches!(
            result,
            Err(PayloadError::ExpectedObject { actual: "an array" })
        ));

        // The text path reports the same defect through the deserializer.
        assert!(matches!(
            ImplementorTable::from_str("[]"),
            Err(PayloadError::MalformedJson(_))
        ));
    }

    #[test]
    fn rejects_a_non_array_library_value() {
        let result: Result<ImplementorTable, _> = json!({"libA": "implA1"}).try_into();
        assert!(matches!(
            result,
            Err(PayloadError::ExpectedArray { ref library, actual: "a string" })
                if library == "libA"
        ));
    }

    #[test]
    fn rejects_a_non_string_implementor() {
        let result: Result<ImplementorTable, _> = json!({"libA": ["ok", 3]}).try_into();
        assert!(matches!(
            result,
            Err(PayloadError::ExpectedString { ref library, index: 1, actual: "a number" })
                if library == "libA"
        ));
    }

    #[test]
    fn rejects_duplicate_library_keys_in_text() {
        let payload = r#"{"libA": ["x"], "libA": ["y"]}"#;

        let error = ImplementorTable::from_str(payload).unwrap_err();
        assert!(error.to_string().contains("duplicate library key \"libA\""));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let table: ImplementorTable = json!({
            "libA": ["implA1", "implA2"],
            "libB": []
        })
        .try_into()
        .unwrap();

        let reparsed = ImplementorTable::from_str(&table.to_string()).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn error_messages_name_the_offending_value() {
        let error = PayloadError::ExpectedString {
            library: "libA".to_string(),
            index: 2,
            actual: "null",
        };
        assert_eq!(
            error.to_string(),
            "expected implementor 2 of \"libA\" to be a string, found null"
        );
    }
}
