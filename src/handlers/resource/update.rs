use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{Map, Value};

use super::coerce::coerce_changes;
use super::{not_found, parse_id};
use crate::api::pick;
use crate::database::Resource;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// PUT /api/<resource>/:id - partial update by the record's owner
///
/// Only the resource's updatable fields are taken from the body, converted to
/// their column types. A body that contributes none of them, or a value the
/// column cannot hold, is rejected before the store is touched.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Option<Extension<AuthUser>>,
    body: Option<Json<Value>>,
) -> ApiResult<R> {
    let changes = match body {
        Some(Json(Value::Object(body))) => pick(&body, R::UPDATABLE),
        _ => Map::new(),
    };
    if changes.is_empty() {
        return Err(ApiError::bad_request("Invalid request body"));
    }
    let changes = coerce_changes::<R>(changes).map_err(|report| {
        ApiError::validation_failed(&report).unwrap_or_else(|| ApiError::bad_request("Invalid request body"))
    })?;

    let id = parse_id::<R>(&id)?;
    let store = R::store(&state);
    let existing = store.find_unique(id).await?.ok_or_else(|| not_found::<R>(id))?;

    let caller = auth.map(|Extension(user)| user.user_id);
    match (existing.owner_id(), caller) {
        (Some(owner), Some(caller)) if owner == caller => {}
        (owner, caller) => {
            tracing::warn!(
                "Denied update of {} {}: owner {:?}, caller {:?}",
                R::TABLE,
                existing.id(),
                owner,
                caller
            );
            return Err(ApiError::forbidden(format!(
                "You are not permitted to update this {}",
                R::LABEL.to_lowercase()
            )));
        }
    }

    let updated = store.update(id, changes).await?;

    Ok(ApiResponse::success(updated)
        .with_message(format!("{} with id {} updated successfully", R::LABEL, id))
        .with_error_flag())
}
