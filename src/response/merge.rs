//! Recursive JSON merge
//!
//! Objects merge key by key and lists concatenate. When a key exists on both
//! sides and the values are not both objects, the values are combined into a
//! list instead of the right side replacing the left. Null and empty
//! containers contribute nothing.

use serde_json::{Map, Value};

/// Merge `right` into `left`
pub fn merge_recursive(left: Value, right: Value) -> Value {
    if is_blank(&right) {
        return left;
    }
    if is_blank(&left) {
        return right;
    }

    match (left, right) {
        (Value::Object(mut left), Value::Object(right)) => {
            for (key, value) in right {
                match left.get_mut(&key) {
                    Some(existing) => {
                        let previous = std::mem::take(existing);
                        *existing = merge_colliding(previous, value);
                    }
                    None => {
                        left.insert(key, value);
                    }
                }
            }
            Value::Object(left)
        }
        (Value::Array(mut left), Value::Array(right)) => {
            left.extend(right);
            Value::Array(left)
        }
        (left, right) => merge_colliding(left, right),
    }
}

/// Merge a sequence of values left to right, starting from the first
///
/// An empty sequence yields `{}`.
pub fn merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    let mut values = values.into_iter();
    let first = values.next().unwrap_or_else(|| Value::Object(Map::new()));
    values.fold(first, merge_recursive)
}

fn merge_colliding(left: Value, right: Value) -> Value {
    match (left, right) {
        (left @ Value::Object(_), right @ Value::Object(_)) => merge_recursive(left, right),
        (left, right) => {
            let mut items = into_list(left);
            items.extend(into_list(right));
            Value::Array(items)
        }
    }
}

fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(map) if map.is_empty() => Vec::new(),
        other => vec![other],
    }
}

/// Null, `{}` and `[]`
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disjoint_objects() {
        let merged = merge_recursive(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_nested_objects_merge() {
        let merged = merge_recursive(
            json!({"meta": {"pagination": {"total": 3}}}),
            json!({"meta": {"links": {"self": "/x"}}}),
        );
        assert_eq!(
            merged,
            json!({"meta": {"pagination": {"total": 3}, "links": {"self": "/x"}}})
        );
    }

    #[test]
    fn test_colliding_scalars_combine() {
        let merged = merge_recursive(json!({"role": "admin"}), json!({"role": "owner"}));
        assert_eq!(merged, json!({"role": ["admin", "owner"]}));
    }

    #[test]
    fn test_colliding_lists_concatenate() {
        let merged = merge_recursive(json!({"tags": [1, 2]}), json!({"tags": [3]}));
        assert_eq!(merged, json!({"tags": [1, 2, 3]}));
    }

    #[test]
    fn test_scalar_and_list_combine() {
        let merged = merge_recursive(json!({"tags": 1}), json!({"tags": [2, 3]}));
        assert_eq!(merged, json!({"tags": [1, 2, 3]}));
    }

    #[test]
    fn test_merge_all_skips_empty() {
        let merged = merge_all([json!({"id": 1}), json!({}), Value::Null, json!({"x": true})]);
        assert_eq!(merged, json!({"id": 1, "x": true}));
    }

    #[test]
    fn test_list_untouched_by_empty_objects() {
        assert_eq!(merge_all([json!([1, 2]), json!({}), json!({})]), json!([1, 2]));
        assert_eq!(merge_recursive(json!({}), json!([1, 2])), json!([1, 2]));
        assert_eq!(merge_recursive(json!([1, 2]), json!([])), json!([1, 2]));
    }

    #[test]
    fn test_empty_sequence_is_object() {
        assert_eq!(merge_all(Vec::<Value>::new()), json!({}));
    }

    #[test]
    fn test_empty_object_value_drops_out_of_collision() {
        let merged = merge_recursive(json!({"tags": {}}), json!({"tags": 1}));
        assert_eq!(merged, json!({"tags": [1]}));
    }

    #[test]
    fn test_colliding_key_keeps_position() {
        let merged = merge_recursive(json!({"b": 1, "a": 2}), json!({"b": 3, "c": 4}));
        let keys: Vec<&String> = merged.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }
}
