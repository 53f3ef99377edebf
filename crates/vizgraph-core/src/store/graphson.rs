// GraphSON typed values
//
// With the `application/vnd.gremlin-v2.0+json` (and v3) serializers the store
// wraps scalars and collections as `{"@type": ..., "@value": ...}`. Everything
// downstream works on plain JSON, so rows are untyped at the adapter boundary.

use super::StoreError;
use serde_json::{Map, Value};

/// Recursively replace `{"@type", "@value"}` wrappers with their plain value.
///
/// `g:Map` values (a flat key/value list in GraphSON 3) become objects; every
/// other type is replaced by its untyped `@value`.
pub fn untype(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(untype).collect()),
        Value::Object(mut map) if is_typed(&map) => {
            let kind = map.remove("@type");
            let inner = map.remove("@value").unwrap_or(Value::Null);
            match kind.as_ref().and_then(Value::as_str) {
                Some("g:Map") => map_from_pairs(inner),
                _ => untype(inner),
            }
        }
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, untype(v))).collect()),
        other => other,
    }
}

fn is_typed(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.get("@type").map_or(false, Value::is_string) && map.contains_key("@value")
}

fn map_from_pairs(inner: Value) -> Value {
    match inner {
        Value::Array(items) => {
            let mut out = Map::new();
            let mut iter = items.into_iter();
            while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
                let key = match untype(key) {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                out.insert(key, untype(value));
            }
            Value::Object(out)
        }
        other => untype(other),
    }
}

/// Turn a response's `result.data` into result rows.
pub fn rows(data: Value) -> Result<Vec<Value>, StoreError> {
    match untype(data) {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        other => Err(StoreError::UnexpectedPayload(other.to_string())),
    }
}
