use serde_json::{Map, Value};

/// Shallow copy of `source` without the named keys. Enumeration order of the
/// remaining keys is preserved; keys that are not present are ignored.
pub fn exclude(source: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    source
        .iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Copy of only the allow-listed keys that `source` actually carries, in
/// allow-list order. A present `null` counts as carried.
pub fn pick(source: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| source.get(*key).map(|value| (key.to_string(), value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn exclude_drops_named_keys_and_keeps_order() {
        let source = object(json!({"a": 1, "b": 2, "c": 3}));
        let projected = exclude(&source, &["b"]);

        assert_eq!(Value::Object(projected.clone()), json!({"a": 1, "c": 3}));
        assert_eq!(projected.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        // source untouched
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn exclude_with_no_keys_is_a_copy() {
        let source = object(json!({"z": true, "a": [1, 2]}));
        assert_eq!(exclude(&source, &[]), source);
    }

    #[test]
    fn exclude_ignores_absent_keys() {
        let source = object(json!({"a": 1}));
        assert_eq!(exclude(&source, &["missing"]), source);
    }

    #[test]
    fn pick_keeps_only_allowed_present_keys() {
        let source = object(json!({"price": 4.5, "user_id": "x", "name": null}));
        let picked = pick(&source, &["name", "description", "price"]);

        assert_eq!(Value::Object(picked.clone()), json!({"name": null, "price": 4.5}));
        assert_eq!(picked.keys().collect::<Vec<_>>(), vec!["name", "price"]);
    }
}
