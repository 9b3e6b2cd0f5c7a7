use super::error::{validate_identifier, FilterError};
use super::types::{OrderBy, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Keep the `field:direction` tokens whose field is sortable, in input
    /// order. Unknown fields are dropped; unknown directions become `asc`.
    pub fn parse(tokens: &[String], sortable: &[&str]) -> Vec<OrderBy> {
        tokens
            .iter()
            .filter_map(|token| {
                let (field, direction) = token.split_once(':').unwrap_or((token.as_str(), ""));
                if !sortable.contains(&field) {
                    return None;
                }
                let direction = SortDirection::parse(direction).unwrap_or_default();
                Some(OrderBy::new(field, direction))
            })
            .collect()
    }

    pub fn generate(order_by: &[OrderBy]) -> Result<String, FilterError> {
        if order_by.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(order_by.len());
        for order in order_by {
            if !validate_identifier(&order.field) {
                return Err(FilterError::InvalidColumn(order.field.clone()));
            }
            parts.push(format!("\"{}\" {}", order.field, order.direction.to_sql()));
        }
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }
}
