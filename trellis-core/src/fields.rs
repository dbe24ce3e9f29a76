//! Flattened JSON fields
//!
//! The document view filter consumes a candidate document as
//! `(pointer, leaf value)` pairs and rebuilds the filtered document from the
//! pairs that survive. Field pointers live in the same pointer space as
//! policy resource paths.

use crate::pointer::ResourcePointer;
use serde_json::{Map, Value};

/// Flatten `value` into `(pointer, leaf)` pairs in document order.
///
/// Objects recurse; scalars and arrays are leaves. An empty object is itself
/// a leaf so rebuilding preserves it. A non-object root yields a single pair
/// at the root pointer.
pub fn flatten_value(value: &Value) -> Vec<(ResourcePointer, Value)> {
    let mut fields = Vec::new();
    flatten_into(&ResourcePointer::root(), value, &mut fields);
    fields
}

fn flatten_into(pointer: &ResourcePointer, value: &Value, out: &mut Vec<(ResourcePointer, Value)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(&pointer.child(key), child, out);
            }
        }
        leaf => out.push((pointer.clone(), leaf.clone())),
    }
}

/// Rebuild a nested document from `(pointer, leaf)` pairs.
///
/// A root-pointer pair replaces the whole document; on conflicting pairs the
/// later one wins.
pub fn expand_fields(fields: &[(ResourcePointer, Value)]) -> Value {
    let mut document = Value::Object(Map::new());
    for (pointer, value) in fields {
        if pointer.is_root() {
            document = value.clone();
        } else {
            insert_leaf(&mut document, pointer, 0, value.clone());
        }
    }
    document
}

fn insert_leaf(current: &mut Value, pointer: &ResourcePointer, depth: usize, value: Value) {
    if !matches!(current, Value::Object(_)) {
        *current = Value::Object(Map::new());
    }
    let Value::Object(map) = current else {
        unreachable!()
    };
    let Some(segment) = pointer.segment(depth) else {
        unreachable!()
    };
    if depth + 1 == pointer.level() {
        map.insert(segment.to_string(), value);
    } else {
        let child = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        insert_leaf(child, pointer, depth + 1, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_object() {
        let document = json!({
            "attributes": { "location": "kitchen", "floor": 2 },
            "serial": "abc"
        });

        let fields = flatten_value(&document);
        let rendered: Vec<(String, Value)> = fields
            .iter()
            .map(|(pointer, value)| (pointer.to_string(), value.clone()))
            .collect();

        // serde_json's Map iterates keys in sorted order
        assert_eq!(
            rendered,
            vec![
                ("/attributes/floor".to_string(), json!(2)),
                ("/attributes/location".to_string(), json!("kitchen")),
                ("/serial".to_string(), json!("abc")),
            ]
        );
    }

    #[test]
    fn test_flatten_scalar_root() {
        let fields = flatten_value(&json!(42));
        assert_eq!(fields.len(), 1);
        assert!(fields[0].0.is_root());
        assert_eq!(fields[0].1, json!(42));
    }

    #[test]
    fn test_flatten_keeps_empty_object_and_array_leaves() {
        let document = json!({ "empty": {}, "tags": ["a", "b"] });
        let fields = flatten_value(&document);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].1, json!({}));
        assert_eq!(fields[1].1, json!(["a", "b"]));
    }

    #[test]
    fn test_expand_round_trip() {
        let document = json!({
            "attributes": { "location": "kitchen", "nested": { "deep": true } },
            "serial": "abc"
        });
        assert_eq!(expand_fields(&flatten_value(&document)), document);
    }

    #[test]
    fn test_expand_empty_is_empty_object() {
        assert_eq!(expand_fields(&[]), json!({}));
    }

    #[test]
    fn test_expand_root_leaf_replaces_document() {
        let fields = vec![(ResourcePointer::root(), json!("scalar"))];
        assert_eq!(expand_fields(&fields), json!("scalar"));
    }
}
