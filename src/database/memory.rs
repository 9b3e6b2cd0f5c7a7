use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::exclude;
use crate::database::manager::DatabaseError;
use crate::database::models::Resource;
use crate::database::store::Store;
use crate::filter::{OrderBy, QueryDescriptor, SortDirection};

/// In-process store holding records as JSON objects. Filtering, ordering and
/// paging follow the same rules as the PostgreSQL repository.
pub struct MemoryStore<R> {
    /// `None` models a collection that does not exist at all.
    rows: RwLock<Option<Vec<Map<String, Value>>>>,
    _phantom: std::marker::PhantomData<fn() -> R>,
}

impl<R: Resource> MemoryStore<R> {
    pub fn new() -> Self {
        Self::from_rows(Some(Vec::new()))
    }

    pub fn absent() -> Self {
        Self::from_rows(None)
    }

    pub fn with_records(records: impl IntoIterator<Item = R>) -> Result<Self, DatabaseError> {
        let rows = records
            .into_iter()
            .map(|record| match serde_json::to_value(record)? {
                Value::Object(map) => Ok(map),
                other => Err(DatabaseError::QueryError(format!(
                    "{} did not serialize to an object: {}",
                    R::LABEL,
                    other
                ))),
            })
            .collect::<Result<Vec<_>, DatabaseError>>()?;
        Ok(Self::from_rows(Some(rows)))
    }

    fn from_rows(rows: Option<Vec<Map<String, Value>>>) -> Self {
        Self {
            rows: RwLock::new(rows),
            _phantom: std::marker::PhantomData,
        }
    }

    fn missing() -> DatabaseError {
        DatabaseError::NotFound(format!("{} collection not found", R::LABEL))
    }
}

impl<R: Resource> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> Store<R> for MemoryStore<R> {
    async fn find_many(&self, query: &QueryDescriptor) -> Result<Vec<R>, DatabaseError> {
        let guard = self.rows.read().await;
        let rows = guard.as_ref().ok_or_else(Self::missing)?;

        let mut matched: Vec<&Map<String, Value>> =
            rows.iter().filter(|row| matches_filters(row, &query.filters)).collect();
        matched.sort_by(|a, b| compare_rows(a, b, &query.order_by));

        matched
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(query.limit as usize)
            .map(|row| Ok(serde_json::from_value(Value::Object(row.clone()))?))
            .collect()
    }

    async fn count(&self, filters: &Map<String, Value>) -> Result<u64, DatabaseError> {
        let guard = self.rows.read().await;
        let rows = guard.as_ref().ok_or_else(Self::missing)?;
        Ok(rows.iter().filter(|row| matches_filters(row, filters)).count() as u64)
    }

    async fn find_unique(&self, id: Uuid) -> Result<Option<R>, DatabaseError> {
        let guard = self.rows.read().await;
        let rows = guard.as_ref().ok_or_else(Self::missing)?;
        rows.iter()
            .find(|row| has_id(row, id))
            .map(|row| serde_json::from_value(Value::Object(row.clone())))
            .transpose()
            .map_err(DatabaseError::from)
    }

    async fn update(&self, id: Uuid, changes: Map<String, Value>) -> Result<R, DatabaseError> {
        let mut guard = self.rows.write().await;
        let rows = guard.as_mut().ok_or_else(Self::missing)?;
        let row = rows
            .iter_mut()
            .find(|row| has_id(row, id))
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {} not found", R::LABEL, id)))?;

        // Stage the write so a change that does not fit the record type leaves
        // the stored row untouched.
        let mut staged = row.clone();
        for (key, value) in exclude(&changes, R::IMMUTABLE) {
            staged.insert(key, value);
        }
        staged.insert("updated_at".to_string(), serde_json::to_value(Utc::now())?);

        let record: R = serde_json::from_value(Value::Object(staged.clone()))?;
        *row = staged;
        Ok(record)
    }
}

fn has_id(row: &Map<String, Value>, id: Uuid) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id.to_string().as_str())
}

fn matches_filters(row: &Map<String, Value>, filters: &Map<String, Value>) -> bool {
    filters
        .iter()
        .all(|(field, expected)| values_equal(row.get(field).unwrap_or(&Value::Null), expected))
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare_rows(a: &Map<String, Value>, b: &Map<String, Value>, order_by: &[OrderBy]) -> Ordering {
    for order in order_by {
        let left = a.get(&order.field).unwrap_or(&Value::Null);
        let right = b.get(&order.field).unwrap_or(&Value::Null);
        let ordering = match order.direction {
            SortDirection::Asc => compare_values(left, right),
            SortDirection::Desc => compare_values(right, left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::MenuOption;
    use serde_json::json;

    fn option(name: &str, max_selection: i32) -> MenuOption {
        MenuOption {
            id: Uuid::new_v4(),
            name: name.to_string(),
            menu_id: None,
            multiple_selection: false,
            max_selection,
            required: false,
            is_active: true,
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn query(filters: Value, order_by: Vec<OrderBy>, skip: u64, limit: u32) -> QueryDescriptor {
        QueryDescriptor {
            page: 1,
            limit,
            skip,
            filters: filters.as_object().cloned().unwrap_or_default(),
            order_by,
        }
    }

    #[tokio::test]
    async fn filters_orders_and_pages() {
        let store = MemoryStore::with_records([option("b", 2), option("a", 2), option("c", 1)]).unwrap();

        let page = store
            .find_many(&query(
                json!({"max_selection": 2}),
                vec![OrderBy::new("name", SortDirection::Asc)],
                0,
                10,
            ))
            .await
            .unwrap();
        let names: Vec<_> = page.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let second = store
            .find_many(&query(json!({}), vec![OrderBy::new("name", SortDirection::Desc)], 1, 1))
            .await
            .unwrap();
        assert_eq!(second[0].name, "b");

        assert_eq!(store.count(&Map::new()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn absent_collection_is_not_found() {
        let store = MemoryStore::<MenuOption>::absent();
        assert!(matches!(store.count(&Map::new()).await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_keeps_immutable_fields() {
        let original = option("a", 1);
        let id = original.id;
        let store = MemoryStore::with_records([original.clone()]).unwrap();

        let changes = json!({"name": "z", "id": Uuid::new_v4(), "created_at": "1999-01-01T00:00:00Z"});
        let updated = store.update(id, changes.as_object().cloned().unwrap()).await.unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "z");
        assert_eq!(updated.created_at, original.created_at);
    }

    #[tokio::test]
    async fn rejected_update_leaves_row_untouched() {
        let original = option("a", 1);
        let id = original.id;
        let store = MemoryStore::with_records([original]).unwrap();

        let changes = json!({"name": "z", "max_selection": "lots"});
        assert!(store.update(id, changes.as_object().cloned().unwrap()).await.is_err());
        assert_eq!(store.find_unique(id).await.unwrap().unwrap().name, "a");
    }
}
