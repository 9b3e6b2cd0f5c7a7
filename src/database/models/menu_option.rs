use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Resource;
use crate::database::store::Store;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MenuOption {
    pub id: Uuid,
    pub name: String,
    pub menu_id: Option<Uuid>,
    pub multiple_selection: bool,
    pub max_selection: i32,
    pub required: bool,
    pub is_active: bool,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for MenuOption {
    const TABLE: &'static str = "menu_options";
    const LABEL: &'static str = "Menu option";
    const FILTERABLE: &'static [&'static str] = &["name", "menu_id", "multiple_selection", "max_selection"];
    const SORTABLE: &'static [&'static str] = &["name", "id"];
    const UPDATABLE: &'static [&'static str] = &["name", "max_selection", "required", "multiple_selection"];
    const NULLABLE: &'static [&'static str] = &["menu_id", "user_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Option<Uuid> {
        self.user_id
    }

    fn column_cast(column: &str) -> Option<&'static str> {
        match column {
            "id" | "user_id" | "menu_id" => Some("uuid"),
            "max_selection" => Some("int4"),
            "multiple_selection" | "required" | "is_active" => Some("boolean"),
            _ => None,
        }
    }

    fn store(state: &AppState) -> &Arc<dyn Store<Self>> {
        &state.menu_options
    }
}
