use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::database::Resource;
use crate::validation::{FieldError, ValidationReport};

/// Rewrites accepted update values into the JSON type their column stores:
/// `"true"`/`1` become booleans, numeric strings become numbers, UUIDs are
/// canonicalised. `null` is kept only for nullable columns.
pub fn coerce_changes<R: Resource>(changes: Map<String, Value>) -> Result<Map<String, Value>, ValidationReport> {
    let mut coerced = Map::with_capacity(changes.len());
    let mut errors = Vec::new();

    for (field, value) in changes {
        let result = if value.is_null() {
            if R::NULLABLE.contains(&field.as_str()) {
                Ok(Value::Null)
            } else {
                Err("The :attribute field may not be null.")
            }
        } else {
            coerce_value(R::column_cast(&field), value)
        };

        match result {
            Ok(value) => {
                coerced.insert(field, value);
            }
            Err(template) => errors.push(FieldError {
                message: template.replace(":attribute", &field),
                field,
            }),
        }
    }

    if errors.is_empty() {
        Ok(coerced)
    } else {
        Err(ValidationReport::Invalid(errors))
    }
}

fn coerce_value(cast: Option<&str>, value: Value) -> Result<Value, &'static str> {
    match cast {
        Some("boolean") => match &value {
            Value::Bool(_) => Ok(value),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err("The :attribute must be a boolean."),
            },
            Value::String(s) => match s.trim() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err("The :attribute must be a boolean."),
            },
            _ => Err("The :attribute must be a boolean."),
        },
        Some("int4") => {
            let parsed = match &value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            parsed
                .and_then(|n| i32::try_from(n).ok())
                .map(Value::from)
                .ok_or("The :attribute must be an integer between -2147483648 and 2147483647.")
        }
        Some("numeric") => match &value {
            Value::Number(_) => Ok(value),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or("The :attribute must be a number."),
            _ => Err("The :attribute must be a number."),
        },
        Some("uuid") => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(|id| Value::String(id.to_string()))
            .ok_or("The :attribute must be a valid uuid."),
        _ => match value {
            Value::String(_) => Ok(value),
            _ => Err("The :attribute must be a string."),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Menu, MenuOption};
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn normalises_loose_scalars_to_column_types() {
        let changes = map(json!({
            "required": "true",
            "multiple_selection": 0,
            "max_selection": " 3 ",
            "name": "Sauce"
        }));
        let coerced = coerce_changes::<MenuOption>(changes).unwrap();
        assert_eq!(
            Value::Object(coerced),
            json!({"required": true, "multiple_selection": false, "max_selection": 3, "name": "Sauce"})
        );
    }

    #[test]
    fn numeric_strings_and_uuids_are_canonicalised() {
        let id = Uuid::new_v4();
        let changes = map(json!({"price": "8.99", "category_id": id.to_string().to_uppercase()}));
        let coerced = coerce_changes::<Menu>(changes).unwrap();
        assert_eq!(coerced["price"], json!(8.99));
        assert_eq!(coerced["category_id"], json!(id.to_string()));
    }

    #[test]
    fn null_is_kept_only_for_nullable_columns() {
        let coerced = coerce_changes::<Menu>(map(json!({"description": null}))).unwrap();
        assert_eq!(coerced["description"], Value::Null);

        let err = coerce_changes::<Menu>(map(json!({"name": null, "price": null}))).unwrap_err();
        let fields: Vec<_> = err.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "price"]);
        assert_eq!(err.errors()[0].message, "The name field may not be null.");
    }

    #[test]
    fn out_of_range_integers_are_rejected() {
        let err = coerce_changes::<MenuOption>(map(json!({"max_selection": 5_000_000_000i64}))).unwrap_err();
        assert_eq!(err.errors()[0].field, "max_selection");
        assert!(coerce_changes::<MenuOption>(map(json!({"required": 2}))).is_err());
    }
}
