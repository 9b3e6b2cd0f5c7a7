use serde_json::{Map, Value};

use super::error::{validate_identifier, FilterError};

pub struct FilterWhere;

impl FilterWhere {
    /// Copy every allow-listed key present in `source` verbatim. Non-object
    /// sources carry no filters.
    pub fn extract(source: &Value, filterable: &[&str]) -> Map<String, Value> {
        let Value::Object(source) = source else {
            return Map::new();
        };
        filterable
            .iter()
            .filter_map(|field| source.get(*field).map(|v| (field.to_string(), v.clone())))
            .collect()
    }

    /// Equality conjunction over `filters`. Placeholders are numbered from
    /// `first_param`; `cast` supplies an optional SQL type per column so text
    /// parameters can be compared against e.g. uuid columns. `null` values
    /// become `IS NULL` and bind nothing.
    pub fn generate(
        filters: &Map<String, Value>,
        first_param: usize,
        cast: impl Fn(&str) -> Option<&'static str>,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut clauses = Vec::with_capacity(filters.len());
        let mut params = Vec::with_capacity(filters.len());

        for (column, value) in filters {
            if !validate_identifier(column) {
                return Err(FilterError::InvalidColumn(column.clone()));
            }
            if value.is_null() {
                clauses.push(format!("\"{}\" IS NULL", column));
                continue;
            }
            let index = first_param + params.len();
            let placeholder = match cast(column) {
                Some(ty) => format!("${}::{}", index, ty),
                None => format!("${}", index),
            };
            clauses.push(format!("\"{}\" = {}", column, placeholder));
            params.push(value.clone());
        }

        Ok((clauses.join(" AND "), params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_ignores_keys_outside_the_allow_list() {
        let filters = FilterWhere::extract(&json!({"name": "Soup", "price": 5}), &["name"]);
        assert_eq!(Value::Object(filters), json!({"name": "Soup"}));
    }

    #[test]
    fn extract_is_case_sensitive() {
        let filters = FilterWhere::extract(&json!({"Name": "Soup"}), &["name"]);
        assert!(filters.is_empty());
    }

    #[test]
    fn extract_from_non_object_is_empty() {
        assert!(FilterWhere::extract(&json!(["name"]), &["name"]).is_empty());
        assert!(FilterWhere::extract(&Value::Null, &["name"]).is_empty());
    }

    #[test]
    fn generates_numbered_placeholders_with_casts() {
        let filters = FilterWhere::extract(
            &json!({"menu_id": "6f1c", "deleted": null, "name": "Soup"}),
            &["name", "menu_id", "deleted"],
        );
        let (sql, params) = FilterWhere::generate(&filters, 1, |c| (c == "menu_id").then_some("uuid")).unwrap();

        assert_eq!(sql, "\"name\" = $1 AND \"menu_id\" = $2::uuid AND \"deleted\" IS NULL");
        assert_eq!(params, vec![json!("Soup"), json!("6f1c")]);
    }

    #[test]
    fn rejects_unsafe_columns() {
        let mut filters = Map::new();
        filters.insert("name; --".into(), json!(1));
        assert!(FilterWhere::generate(&filters, 1, |_| None).is_err());
    }
}
