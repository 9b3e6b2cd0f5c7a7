pub mod menu;
pub mod menu_option;

pub use menu::Menu;
pub use menu_option::MenuOption;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};
use uuid::Uuid;

use crate::database::store::Store;
use crate::state::AppState;

/// A table exposed through the generic list / show / update handlers.
pub trait Resource:
    Serialize + DeserializeOwned + for<'r> FromRow<'r, PgRow> + Clone + Send + Sync + Unpin + 'static
{
    const TABLE: &'static str;
    /// Human readable name used in response messages.
    const LABEL: &'static str;
    const FILTERABLE: &'static [&'static str];
    const SORTABLE: &'static [&'static str];
    const UPDATABLE: &'static [&'static str];
    /// Never written by an update, whatever the caller sends.
    const IMMUTABLE: &'static [&'static str] = &["id", "user_id", "created_at", "updated_at"];
    /// Columns that accept `NULL`.
    const NULLABLE: &'static [&'static str] = &[];

    fn id(&self) -> Uuid;

    /// Identity allowed to mutate the record.
    fn owner_id(&self) -> Option<Uuid>;

    /// SQL type a bound parameter must be cast to for `column`.
    fn column_cast(column: &str) -> Option<&'static str> {
        match column {
            "id" | "user_id" => Some("uuid"),
            _ => None,
        }
    }

    fn store(state: &AppState) -> &Arc<dyn Store<Self>>;
}
