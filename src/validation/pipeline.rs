use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::rules::{Rule, RuleError};

/// How many failures a single field may contribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvaluationPolicy {
    /// Stop at the first failing rule; at most one error per field.
    #[default]
    StopAtFirst,
    /// Evaluate every rule and report each failure.
    CollectAll,
}

/// Ordered `field path -> rule expression` declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: Vec<(String, String)>,
    policy: EvaluationPolicy,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `path`. Re-declaring a path replaces its expression but keeps
    /// its original position.
    pub fn field(mut self, path: impl Into<String>, expression: impl Into<String>) -> Self {
        let path = path.into();
        let expression = expression.into();
        match self.fields.iter_mut().find(|(p, _)| *p == path) {
            Some(existing) => existing.1 = expression,
            None => self.fields.push((path, expression)),
        }
        self
    }

    pub fn policy(mut self, policy: EvaluationPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn compile(&self) -> Result<Vec<(&str, Vec<Rule>)>, RuleError> {
        self.fields
            .iter()
            .map(|(path, expression)| Ok((path.as_str(), Rule::parse_expression(expression)?)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(RuleSet::new(), |rules, (path, expression)| rules.field(path, expression))
    }
}

/// Message overrides keyed by `field.rule`, or by a bare `rule` to apply to
/// every field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomMessages(HashMap<String, String>);

impl CustomMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.0.insert(key.into(), message.into());
        self
    }

    fn lookup(&self, field: &str, rule: &str) -> Option<&str> {
        self.0
            .get(&format!("{}.{}", field, rule))
            .or_else(|| self.0.get(rule))
            .map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomMessages {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReport {
    Valid,
    Invalid(Vec<FieldError>),
    /// The rules themselves could not be evaluated.
    Aborted(String),
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationReport::Valid)
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationReport::Invalid(errors) => errors,
            _ => &[],
        }
    }

    pub fn detail(&self) -> Option<ValidationDetail> {
        match self {
            ValidationReport::Valid => None,
            ValidationReport::Invalid(errors) => Some(ValidationDetail::Fields(errors.clone())),
            ValidationReport::Aborted(message) => Some(ValidationDetail::Message(message.clone())),
        }
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("valid", &self.is_valid())?;
        match self {
            ValidationReport::Valid => {}
            ValidationReport::Invalid(errors) => map.serialize_entry("errors", errors)?,
            ValidationReport::Aborted(message) => map.serialize_entry("error", message)?,
        }
        map.end()
    }
}

/// Either the per-field errors or the message of a rule-engine failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ValidationDetail {
    Fields(Vec<FieldError>),
    Message(String),
}

/// Result shape for callers that branch on validation immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationDetail>,
}

impl From<ValidationReport> for ValidationOutcome {
    fn from(report: ValidationReport) -> Self {
        match report.detail() {
            None => Self { error: false, message: None, validation: None },
            Some(detail) => Self {
                error: true,
                message: Some("Validation Error".to_string()),
                validation: Some(detail),
            },
        }
    }
}

/// Runs every declared field's rules against `payload`. Failing fields are
/// reported in declaration order; a malformed rule set yields
/// [`ValidationReport::Aborted`] instead of an error.
pub fn validate(rules: &RuleSet, payload: &Value, messages: &CustomMessages) -> ValidationReport {
    let compiled = match rules.compile() {
        Ok(compiled) => compiled,
        Err(e) => {
            tracing::warn!("Validation rules could not be evaluated: {}", e);
            return ValidationReport::Aborted(e.to_string());
        }
    };

    let mut errors = Vec::new();
    for (path, field_rules) in compiled {
        let value = lookup(payload, path);
        for rule in field_rules {
            if rule.check(value) {
                continue;
            }
            errors.push(FieldError {
                field: path.to_string(),
                message: render_message(path, &rule, messages),
            });
            if rules.policy == EvaluationPolicy::StopAtFirst {
                break;
            }
        }
    }

    if errors.is_empty() {
        ValidationReport::Valid
    } else {
        ValidationReport::Invalid(errors)
    }
}

pub fn validate_input(rules: &RuleSet, messages: &CustomMessages, payload: &Value) -> ValidationOutcome {
    validate(rules, payload, messages).into()
}

pub fn validate_object(rules: &RuleSet, payload: &Value) -> ValidationOutcome {
    validate(rules, payload, &CustomMessages::default()).into()
}

/// Dot-path lookup; numeric segments index into arrays.
fn lookup<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(payload, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn render_message(field: &str, rule: &Rule, messages: &CustomMessages) -> String {
    let template = messages
        .lookup(field, rule.name())
        .unwrap_or_else(|| rule.default_message());
    let args = rule.args();

    let mut message = template
        .replace(":attribute", field)
        .replace(":args", &args.join(","));
    for (i, arg) in args.iter().enumerate() {
        message = message.replace(&format!(":arg{}", i), arg);
    }
    message
}
