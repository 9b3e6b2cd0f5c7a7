use crate::middleware::InputRules;
use crate::validation::RuleSet;

/// Body rules for `PUT /api/menus/:id`.
pub fn update_rules() -> InputRules {
    InputRules::new(
        RuleSet::new()
            .field("name", "string|maxLength:255")
            .field("description", "string")
            .field("price", "numeric|min:0")
            .field("category_id", "uuid"),
    )
}
