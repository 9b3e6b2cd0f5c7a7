pub mod pipeline;
pub mod rules;

pub use pipeline::{
    validate, validate_input, validate_object, CustomMessages, EvaluationPolicy, FieldError, RuleSet,
    ValidationDetail, ValidationOutcome, ValidationReport,
};
pub use rules::{Rule, RuleError};
