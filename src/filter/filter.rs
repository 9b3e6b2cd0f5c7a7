use serde_json::Value;

use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{ListParams, QueryDescriptor, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_SKIP};

/// Turns untrusted list parameters into a [`QueryDescriptor`].
///
/// Building never fails: malformed pagination falls back to the defaults and
/// fields outside the allow-lists are dropped without error.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptionsBuilder<'a> {
    filterable: &'a [&'a str],
    sortable: &'a [&'a str],
    max_limit: Option<u32>,
}

impl<'a> QueryOptionsBuilder<'a> {
    pub fn new(filterable: &'a [&'a str], sortable: &'a [&'a str]) -> Self {
        Self {
            filterable,
            sortable,
            max_limit: None,
        }
    }

    /// Upper bound for `limit`. `None` leaves the requested limit as is.
    pub fn max_limit(mut self, max_limit: Option<u32>) -> Self {
        self.max_limit = max_limit.filter(|max| *max > 0);
        self
    }

    pub fn build(&self, params: &ListParams, filter_source: &Value) -> QueryDescriptor {
        let page = parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let mut limit = parse_positive(params.limit.as_deref()).unwrap_or(DEFAULT_LIMIT);

        if let Some(max) = self.max_limit {
            if limit > max {
                tracing::debug!("limit {} exceeds max {}, capping", limit, max);
                limit = max;
            }
        }

        let skip = u64::from(page - 1)
            .saturating_mul(u64::from(limit))
            .min(MAX_SKIP);

        QueryDescriptor {
            page,
            limit,
            skip,
            filters: FilterWhere::extract(filter_source, self.filterable),
            order_by: FilterOrder::parse(&params.sort, self.sortable),
        }
    }
}

/// Parses a strictly positive integer; zero, negatives and garbage yield `None`.
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{OrderBy, SortDirection};
    use serde_json::json;

    const FILTERABLE: &[&str] = &["name", "menu_id"];
    const SORTABLE: &[&str] = &["name", "id"];

    fn params(page: Option<&str>, limit: Option<&str>, sort: &[&str]) -> ListParams {
        ListParams {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            sort: sort.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn computes_skip_from_page_and_limit() {
        let builder = QueryOptionsBuilder::new(FILTERABLE, SORTABLE);
        for (page, limit) in [(1u32, 1u32), (2, 10), (3, 7), (10, 25)] {
            let q = builder.build(
                &params(Some(&page.to_string()), Some(&limit.to_string()), &[]),
                &Value::Null,
            );
            assert_eq!((q.page, q.limit), (page, limit));
            assert_eq!(q.skip, u64::from((page - 1) * limit));
        }
    }

    #[test]
    fn malformed_pagination_falls_back_to_defaults() {
        let builder = QueryOptionsBuilder::new(FILTERABLE, SORTABLE);
        for raw in [None, Some(""), Some("abc"), Some("0"), Some("-3"), Some("NaN"), Some("1.5"), Some("2abc")] {
            let q = builder.build(&params(raw, raw, &[]), &Value::Null);
            assert_eq!((q.page, q.limit, q.skip), (1, 10, 0), "input {:?}", raw);
        }
    }

    #[test]
    fn skip_never_exceeds_a_bigint_offset() {
        let builder = QueryOptionsBuilder::new(FILTERABLE, SORTABLE);
        let q = builder.build(&params(Some("4294967295"), Some("4294967295"), &[]), &Value::Null);
        assert_eq!(q.skip, i64::MAX as u64);

        let q = builder.build(&params(Some("2147483648"), Some("2"), &[]), &Value::Null);
        assert_eq!(q.skip, 4294967294);
    }

    #[test]
    fn keeps_only_allow_listed_filters() {
        let builder = QueryOptionsBuilder::new(&["name"], SORTABLE);
        let q = builder.build(&ListParams::default(), &json!({"name": "Soup", "price": 5}));
        assert_eq!(Value::Object(q.filters), json!({"name": "Soup"}));
    }

    #[test]
    fn keeps_only_allow_listed_sorts() {
        let builder = QueryOptionsBuilder::new(FILTERABLE, SORTABLE);
        let q = builder.build(&params(None, None, &["price:asc", "name:desc"]), &Value::Null);
        assert_eq!(q.order_by, vec![OrderBy::new("name", SortDirection::Desc)]);
    }

    #[test]
    fn max_limit_caps_only_when_configured() {
        let p = params(Some("1"), Some("500"), &[]);
        let uncapped = QueryOptionsBuilder::new(FILTERABLE, SORTABLE).build(&p, &Value::Null);
        assert_eq!(uncapped.limit, 500);

        let capped = QueryOptionsBuilder::new(FILTERABLE, SORTABLE)
            .max_limit(Some(100))
            .build(&p, &Value::Null);
        assert_eq!(capped.limit, 100);
    }
}
