pub mod coerce;
pub mod list;
pub mod show;
pub mod update;

pub use list::list;
pub use show::show;
pub use update::update;

use uuid::Uuid;

use crate::database::Resource;
use crate::error::ApiError;

/// Ids that are not UUIDs cannot match any record.
fn parse_id<R: Resource>(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| not_found::<R>(raw))
}

fn not_found<R: Resource>(id: impl std::fmt::Display) -> ApiError {
    ApiError::not_found(format!("{} not found for {}", R::LABEL, id))
}
