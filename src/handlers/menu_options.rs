use crate::middleware::InputRules;
use crate::validation::RuleSet;

/// Body rules for `PUT /api/menu-options/:id`.
pub fn update_rules() -> InputRules {
    InputRules::new(
        RuleSet::new()
            .field("name", "string|maxLength:255")
            .field("max_selection", "integer|min:0")
            .field("required", "boolean")
            .field("multiple_selection", "boolean"),
    )
}
