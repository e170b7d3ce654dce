//! # Entity Mapper
//!
//! Converts JSON payloads to and from the typed records in
//! [`models`](crate::models).
//!
//! Reading is tolerant: keys the record does not know are logged and dropped.
//! Writing prunes empty values recursively, since the API expects absent
//! optional fields to be omitted rather than sent as `null`.

use std::collections::BTreeSet;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;

/// Map a JSON value onto a record.
///
/// Unknown keys, at any depth, are logged at debug level and dropped. Missing
/// keys leave the corresponding fields unset. Values of the wrong type are an
/// error.
pub fn from_json<T>(value: Value) -> Result<T>
where
  T: DeserializeOwned + Serialize,
{
  let entity = T::deserialize(&value)?;

  let mapped = serde_json::to_value(&entity)?;
  let unknown = unknown_fields(&value, &mapped);
  if !unknown.is_empty() {
    debug!(
      entity = std::any::type_name::<T>(),
      fields = ?unknown,
      "Dropping fields not present on record"
    );
  }

  Ok(entity)
}

/// Serialize a record, omitting empty values.
pub fn to_json<T: Serialize>(entity: &T) -> Result<Value> {
  Ok(prune_empty(serde_json::to_value(entity)?))
}

/// Recursively drop `null`, empty strings, empty arrays and objects left
/// empty after pruning. Booleans and numbers are kept.
pub fn prune_empty(value: Value) -> Value {
  match value {
    Value::Object(map) => Value::Object(
      map
        .into_iter()
        .map(|(key, value)| (key, prune_empty(value)))
        .filter(|(_, value)| !is_empty(value))
        .collect::<Map<String, Value>>(),
    ),
    Value::Array(items) => Value::Array(
      items
        .into_iter()
        .map(prune_empty)
        .filter(|value| !is_empty(value))
        .collect(),
    ),
    other => other,
  }
}

fn is_empty(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::String(s) => s.is_empty(),
    Value::Array(items) => items.is_empty(),
    Value::Object(map) => map.is_empty(),
    Value::Bool(_) | Value::Number(_) => false,
  }
}

/// Dotted paths present in `input` that did not survive a round trip through
/// the record. `[]` marks array elements.
pub fn unknown_fields(input: &Value, mapped: &Value) -> BTreeSet<String> {
  let mut unknown = BTreeSet::new();
  collect_unknown(input, mapped, "", &mut unknown);
  unknown
}

fn collect_unknown(input: &Value, mapped: &Value, prefix: &str, unknown: &mut BTreeSet<String>) {
  match (input, mapped) {
    (Value::Object(input), Value::Object(mapped)) => {
      for (key, value) in input {
        let path = if prefix.is_empty() {
          key.clone()
        } else {
          format!("{prefix}.{key}")
        };
        match mapped.get(key) {
          Some(mapped_value) => collect_unknown(value, mapped_value, &path, unknown),
          None => {
            unknown.insert(path);
          }
        }
      }
    }
    (Value::Array(input), Value::Array(mapped)) => {
      let path = format!("{prefix}[]");
      for (value, mapped_value) in input.iter().zip(mapped) {
        collect_unknown(value, mapped_value, &path, unknown);
      }
    }
    _ => {}
  }
}
