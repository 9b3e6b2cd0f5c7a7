use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;
use validator::{ValidateEmail, ValidateUrl};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Validation rule '{0}' is not supported")]
    UnknownRule(String),

    #[error("Validation rule '{0}' requires an argument")]
    MissingArgument(String),

    #[error("Invalid argument '{arg}' for validation rule '{rule}'")]
    InvalidArgument { rule: String, arg: String },
}

/// A single named predicate. Expressions such as `required|email|maxLength:64`
/// compile into a sequence of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    String,
    Numeric,
    Integer,
    Boolean,
    Email,
    Url,
    Uuid,
    Min(f64),
    Max(f64),
    MinLength(usize),
    MaxLength(usize),
    In(Vec<std::string::String>),
}

impl Rule {
    pub fn parse_expression(expression: &str) -> Result<Vec<Rule>, RuleError> {
        expression
            .split('|')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Rule::parse)
            .collect()
    }

    pub fn parse(token: &str) -> Result<Rule, RuleError> {
        let (name, arg) = match token.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (token.trim(), None),
        };

        let rule = match name {
            "required" => Rule::Required,
            "string" => Rule::String,
            "numeric" => Rule::Numeric,
            "integer" => Rule::Integer,
            "boolean" => Rule::Boolean,
            "email" => Rule::Email,
            "url" => Rule::Url,
            "uuid" => Rule::Uuid,
            "min" => Rule::Min(number_arg(name, arg)?),
            "max" => Rule::Max(number_arg(name, arg)?),
            "minLength" => Rule::MinLength(length_arg(name, arg)?),
            "maxLength" => Rule::MaxLength(length_arg(name, arg)?),
            "in" => {
                let arg = required_arg(name, arg)?;
                Rule::In(arg.split(',').map(|s| s.trim().to_string()).collect())
            }
            other => return Err(RuleError::UnknownRule(other.to_string())),
        };
        Ok(rule)
    }

    /// Name used for custom message keys (`field.name`).
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::String => "string",
            Rule::Numeric => "numeric",
            Rule::Integer => "integer",
            Rule::Boolean => "boolean",
            Rule::Email => "email",
            Rule::Url => "url",
            Rule::Uuid => "uuid",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::MinLength(_) => "minLength",
            Rule::MaxLength(_) => "maxLength",
            Rule::In(_) => "in",
        }
    }

    pub fn args(&self) -> Vec<std::string::String> {
        match self {
            Rule::Min(n) | Rule::Max(n) => vec![n.to_string()],
            Rule::MinLength(n) | Rule::MaxLength(n) => vec![n.to_string()],
            Rule::In(options) => options.clone(),
            _ => vec![],
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Rule::Required => "The :attribute field is mandatory.",
            Rule::String => "The :attribute must be a string.",
            Rule::Numeric => "The :attribute must be a number.",
            Rule::Integer => "The :attribute must be an integer.",
            Rule::Boolean => "The :attribute must be a boolean.",
            Rule::Email => "The :attribute must be a valid email address.",
            Rule::Url => "The :attribute must be a valid url.",
            Rule::Uuid => "The :attribute must be a valid uuid.",
            Rule::Min(_) => "The :attribute must be greater than or equal to :arg0.",
            Rule::Max(_) => "The :attribute must be less than or equal to :arg0.",
            Rule::MinLength(_) => "The :attribute must not be less than :arg0 characters long.",
            Rule::MaxLength(_) => "The :attribute can not be greater than :arg0 characters long.",
            Rule::In(_) => "The :attribute must be one of :args.",
        }
    }

    /// `value` is `None` when the path does not exist in the payload. Every
    /// rule except `required` accepts an empty value (absent, null or "").
    pub fn check(&self, value: Option<&Value>) -> bool {
        let Some(value) = value.filter(|v| !is_empty(Some(*v))) else {
            return !matches!(self, Rule::Required);
        };

        match self {
            Rule::Required => true,
            Rule::String => value.is_string(),
            Rule::Numeric => as_number(value).is_some(),
            Rule::Integer => match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => s.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            Rule::Boolean => match value {
                Value::Bool(_) => true,
                Value::String(s) => matches!(s.as_str(), "true" | "false" | "0" | "1"),
                Value::Number(n) => matches!(n.as_u64(), Some(0 | 1)),
                _ => false,
            },
            Rule::Email => value.as_str().is_some_and(|s| s.validate_email()),
            Rule::Url => value.as_str().is_some_and(|s| s.validate_url()),
            Rule::Uuid => value.as_str().is_some_and(|s| Uuid::parse_str(s).is_ok()),
            Rule::Min(min) => as_number(value).is_some_and(|n| n >= *min),
            Rule::Max(max) => as_number(value).is_some_and(|n| n <= *max),
            Rule::MinLength(min) => value.as_str().is_some_and(|s| s.chars().count() >= *min),
            Rule::MaxLength(max) => value.as_str().is_some_and(|s| s.chars().count() <= *max),
            Rule::In(options) => {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return false,
                };
                options.iter().any(|option| *option == text)
            }
        }
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn required_arg<'a>(rule: &str, arg: Option<&'a str>) -> Result<&'a str, RuleError> {
    arg.filter(|a| !a.is_empty())
        .ok_or_else(|| RuleError::MissingArgument(rule.to_string()))
}

fn number_arg(rule: &str, arg: Option<&str>) -> Result<f64, RuleError> {
    let arg = required_arg(rule, arg)?;
    arg.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| RuleError::InvalidArgument { rule: rule.to_string(), arg: arg.to_string() })
}

fn length_arg(rule: &str, arg: Option<&str>) -> Result<usize, RuleError> {
    let arg = required_arg(rule, arg)?;
    arg.parse::<usize>()
        .map_err(|_| RuleError::InvalidArgument { rule: rule.to_string(), arg: arg.to_string() })
}
