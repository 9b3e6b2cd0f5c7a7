use serde_json::{Map, Value};
use sqlx::{self, postgres::PgArguments, FromRow};
use uuid::Uuid;

use crate::api::exclude;
use crate::database::models::Resource;
use crate::filter::error::validate_identifier;
use crate::filter::filter_order::FilterOrder;
use crate::filter::filter_where::FilterWhere;
use crate::filter::{FilterError, QueryDescriptor, SqlResult};

/// Parameterised SQL for one [`Resource`] table.
pub struct QueryBuilder<R> {
    table_name: &'static str,
    _phantom: std::marker::PhantomData<R>,
}

impl<R: Resource> QueryBuilder<R> {
    pub fn new() -> Result<Self, FilterError> {
        if !validate_identifier(R::TABLE) {
            return Err(FilterError::InvalidTableName(R::TABLE.to_string()));
        }
        Ok(Self {
            table_name: R::TABLE,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn select_page(&self, query: &QueryDescriptor) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&query.filters, 1, R::column_cast)?;
        let order_clause = FilterOrder::generate(&query.order_by)?;

        let sql = [
            format!("SELECT * FROM \"{}\"", self.table_name),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            order_clause,
            format!("LIMIT {} OFFSET {}", query.limit, query.skip),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query: sql, params })
    }

    pub fn count(&self, filters: &Map<String, Value>) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(filters, 1, R::column_cast)?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table_name)
        } else {
            format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", self.table_name, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    pub fn select_by_id(&self, id: Uuid) -> SqlResult {
        SqlResult {
            query: format!("SELECT * FROM \"{}\" WHERE \"id\" = $1::uuid", self.table_name),
            params: vec![Value::String(id.to_string())],
        }
    }

    /// `UPDATE ... RETURNING *`. Immutable columns in `changes` are ignored;
    /// `updated_at` is always refreshed.
    pub fn update(&self, id: Uuid, changes: &Map<String, Value>) -> Result<SqlResult, FilterError> {
        let changes = exclude(changes, R::IMMUTABLE);
        let mut assignments = Vec::with_capacity(changes.len() + 1);
        let mut params = Vec::with_capacity(changes.len() + 1);

        for (column, value) in changes {
            if !validate_identifier(&column) {
                return Err(FilterError::InvalidColumn(column));
            }
            let index = params.len() + 1;
            let placeholder = match R::column_cast(&column) {
                Some(ty) => format!("${}::{}", index, ty),
                None => format!("${}", index),
            };
            assignments.push(format!("\"{}\" = {}", column, placeholder));
            params.push(value);
        }
        assignments.push("\"updated_at\" = NOW()".to_string());
        params.push(Value::String(id.to_string()));

        let query = format!(
            "UPDATE \"{}\" SET {} WHERE \"id\" = ${}::uuid RETURNING *",
            self.table_name,
            assignments.join(", "),
            params.len()
        );
        Ok(SqlResult { query, params })
    }
}

pub fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(sqlx::types::Json(v)),
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(sqlx::types::Json(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Menu, MenuOption};
    use crate::filter::{OrderBy, SortDirection};
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn select_page_with_filters_order_and_paging() {
        let query = QueryDescriptor {
            page: 3,
            limit: 5,
            skip: 10,
            filters: map(json!({"name": "Soup", "menu_id": "0c3c7d4e-5a44-4d6e-9f0e-111111111111"})),
            order_by: vec![OrderBy::new("name", SortDirection::Desc)],
        };
        let sql = QueryBuilder::<MenuOption>::new().unwrap().select_page(&query).unwrap();

        assert_eq!(
            sql.query,
            "SELECT * FROM \"menu_options\" WHERE \"name\" = $1 AND \"menu_id\" = $2::uuid \
             ORDER BY \"name\" DESC LIMIT 5 OFFSET 10"
        );
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn count_without_filters() {
        let sql = QueryBuilder::<Menu>::new().unwrap().count(&Map::new()).unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*) AS count FROM \"menus\"");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn update_skips_immutable_columns() {
        let id = Uuid::nil();
        let changes = map(json!({"name": "Lunch", "user_id": "someone-else", "price": 8.5}));
        let sql = QueryBuilder::<Menu>::new().unwrap().update(id, &changes).unwrap();

        assert_eq!(
            sql.query,
            "UPDATE \"menus\" SET \"name\" = $1, \"price\" = $2::numeric, \"updated_at\" = NOW() \
             WHERE \"id\" = $3::uuid RETURNING *"
        );
        assert_eq!(sql.params, vec![json!("Lunch"), json!(8.5), json!(id.to_string())]);
    }
}
