use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde_json::Value;

use crate::database::Resource;
use crate::filter::{ListParams, QueryOptionsBuilder};
use crate::middleware::{ApiResponse, ApiResult, PaginationInfo};
use crate::state::AppState;

/// POST /api/<resource>/get - one page of records
///
/// `page`, `limit` and repeated `sort=field:dir` come from the query string;
/// equality filters come from the JSON body. Both are reduced to the
/// resource's allow-lists before reaching the store.
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Option<Json<Value>>,
) -> ApiResult<Vec<R>> {
    let params = ListParams::from_query(query.as_deref());
    let filter_source = body.map(|Json(value)| value).unwrap_or(Value::Null);

    let descriptor = QueryOptionsBuilder::new(R::FILTERABLE, R::SORTABLE)
        .max_limit(state.max_limit)
        .build(&params, &filter_source);
    tracing::debug!("Listing {}: {:?}", R::TABLE, descriptor);

    let store = R::store(&state);
    let (records, total_items) =
        tokio::try_join!(store.find_many(&descriptor), store.count(&descriptor.filters))?;

    let pagination = PaginationInfo {
        total_items,
        total_pages: descriptor.total_pages(total_items),
        current_page: descriptor.page,
    };

    Ok(ApiResponse::success(records).with_pagination(pagination))
}
