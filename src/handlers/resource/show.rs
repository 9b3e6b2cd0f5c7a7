use axum::extract::{Path, State};

use super::{not_found, parse_id};
use crate::database::Resource;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/<resource>/:id
pub async fn show<R: Resource>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<R> {
    let id = parse_id::<R>(&id)?;

    let record = R::store(&state)
        .find_unique(id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    Ok(ApiResponse::success(record).with_message(format!("{} with id {} fetched successfully", R::LABEL, id)))
}
