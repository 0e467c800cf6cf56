//! Lenient lookups over raw wire JSON.
//!
//! Sender, group and operator projections read nested objects that the
//! gateway may omit, send as `null`, or fill with unexpected types. Every
//! helper here degrades such cases to `None` instead of failing, so nested
//! lookups can be chained without checks:
//!
//! ```rust,ignore
//! use miraikit_core::wire;
//!
//! let group = wire::field(wire::field(&payload, "sender"), "group");
//! let group_id = wire::i64_field(group, "id");
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;

static NULL: Value = Value::Null;

/// Returns the value at `key`, or `null` if `value` is not an object or the
/// key is absent.
pub fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

/// Returns the integer at `key`, if present and integral.
pub fn i64_field(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

/// Returns the string at `key`, if present and a string.
pub fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Returns an owned copy of the string at `key`, if present and a string.
pub fn string_field(value: &Value, key: &str) -> Option<String> {
    str_field(value, key).map(str::to_owned)
}

/// Returns the `type` tag of a wire object.
pub fn type_tag(value: &Value) -> Option<&str> {
    str_field(value, "type")
}

/// Deserializes a field that may be `null`, mapping `null` to the default.
///
/// Use together with `#[serde(default)]` so that absent and `null` fields
/// behave the same way.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
