use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest offset PostgreSQL accepts (`bigint`).
pub const MAX_SKIP: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Exact, case-sensitive match; anything else is not a direction.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self { field: field.into(), direction }
    }
}

/// Raw list parameters as they arrive on the query string, before any
/// normalization. `sort` holds every `sort=` occurrence in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Vec<String>,
}

impl ListParams {
    /// Parse a raw `application/x-www-form-urlencoded` query string. Repeated
    /// `sort` (or `sort[]`) keys accumulate; the last `page`/`limit` wins.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = ListParams::default();
        let Some(raw) = raw else { return params };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "page" => params.page = Some(value.into_owned()),
                "limit" => params.limit = Some(value.into_owned()),
                "sort" | "sort[]" => params.sort.push(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

/// Normalized pagination, filter and ordering ready for a store query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDescriptor {
    pub page: u32,
    pub limit: u32,
    pub skip: u64,
    pub filters: Map<String, Value>,
    pub order_by: Vec<OrderBy>,
}

impl QueryDescriptor {
    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(u64::from(self.limit))
    }
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            skip: 0,
            filters: Map::new(),
            order_by: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
