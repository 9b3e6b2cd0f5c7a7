use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::QueryDescriptor;

/// Persistence operations the handlers need for one resource type.
#[async_trait]
pub trait Store<R>: Send + Sync {
    /// One page of records matching `query.filters`, ordered by `query.order_by`.
    async fn find_many(&self, query: &QueryDescriptor) -> Result<Vec<R>, DatabaseError>;

    async fn count(&self, filters: &Map<String, Value>) -> Result<u64, DatabaseError>;

    async fn find_unique(&self, id: Uuid) -> Result<Option<R>, DatabaseError>;

    /// Apply `changes` to the record and return its new state.
    async fn update(&self, id: Uuid, changes: Map<String, Value>) -> Result<R, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
