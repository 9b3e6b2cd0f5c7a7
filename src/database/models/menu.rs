use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Resource;
use crate::database::store::Store;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Menu {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Menu {
    const TABLE: &'static str = "menus";
    const LABEL: &'static str = "Menu";
    const FILTERABLE: &'static [&'static str] = &["name", "category_id", "user_id"];
    const SORTABLE: &'static [&'static str] = &["name", "id", "price", "created_at"];
    const UPDATABLE: &'static [&'static str] = &["name", "description", "price", "category_id"];
    const NULLABLE: &'static [&'static str] = &["description", "category_id", "user_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Option<Uuid> {
        self.user_id
    }

    fn column_cast(column: &str) -> Option<&'static str> {
        match column {
            "id" | "user_id" | "category_id" => Some("uuid"),
            "price" => Some("numeric"),
            _ => None,
        }
    }

    fn store(state: &AppState) -> &Arc<dyn Store<Self>> {
        &state.menus
    }
}
