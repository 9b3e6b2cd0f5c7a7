use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Resource;
use crate::database::query_builder::{bind_param_query, bind_param_query_as, QueryBuilder};
use crate::database::store::Store;
use crate::filter::QueryDescriptor;

/// PostgreSQL undefined_table.
const UNDEFINED_TABLE: &str = "42P01";

pub struct Repository<R> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<fn() -> R>,
}

impl<R: Resource> Repository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    /// A missing table means the collection itself is absent, which callers
    /// report as not found rather than as an internal failure.
    fn classify(err: sqlx::Error) -> DatabaseError {
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some(UNDEFINED_TABLE) {
                return DatabaseError::NotFound(format!("{} collection not found", R::LABEL));
            }
        }
        DatabaseError::Sqlx(err)
    }
}

#[async_trait]
impl<R: Resource> Store<R> for Repository<R> {
    async fn find_many(&self, query: &QueryDescriptor) -> Result<Vec<R>, DatabaseError> {
        let sql = QueryBuilder::<R>::new()?.select_page(query)?;
        let mut q = sqlx::query_as::<_, R>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q.fetch_all(&self.pool).await.map_err(Self::classify)
    }

    async fn count(&self, filters: &Map<String, Value>) -> Result<u64, DatabaseError> {
        let sql = QueryBuilder::<R>::new()?.count(filters)?;
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await.map_err(Self::classify)?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }

    async fn find_unique(&self, id: Uuid) -> Result<Option<R>, DatabaseError> {
        let sql = QueryBuilder::<R>::new()?.select_by_id(id);
        let mut q = sqlx::query_as::<_, R>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q.fetch_optional(&self.pool).await.map_err(Self::classify)
    }

    async fn update(&self, id: Uuid, changes: Map<String, Value>) -> Result<R, DatabaseError> {
        let sql = QueryBuilder::<R>::new()?.update(id, &changes)?;
        let mut q = sqlx::query_as::<_, R>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q.fetch_optional(&self.pool)
            .await
            .map_err(Self::classify)?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {} not found", R::LABEL, id)))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
