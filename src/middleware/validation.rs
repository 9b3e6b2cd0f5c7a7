use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};

use crate::config;
use crate::error::ApiError;
use crate::validation::{validate, CustomMessages, RuleSet, ValidationReport};

/// Rules and message overrides checked against a route's JSON body.
#[derive(Clone, Default)]
pub struct InputRules {
    pub rules: Arc<RuleSet>,
    pub messages: Arc<CustomMessages>,
}

impl InputRules {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules: Arc::new(rules),
            messages: Arc::default(),
        }
    }

    pub fn with_messages(mut self, messages: CustomMessages) -> Self {
        self.messages = Arc::new(messages);
        self
    }
}

/// Failed report left in the request extensions for [`handle_validation_error`].
#[derive(Clone, Debug)]
pub struct ValidationFailure(pub ValidationReport);

/// Validates the JSON body and records any failure without rejecting the
/// request. The body is handed on unchanged.
pub async fn validate_input_middleware(
    State(input): State<InputRules>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let limit = config::config().api.max_request_size_bytes;
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {}", e)))?;

    let report = if bytes.iter().all(u8::is_ascii_whitespace) {
        validate(&input.rules, &json!({}), &input.messages)
    } else {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(payload) => validate(&input.rules, &payload, &input.messages),
            Err(e) => ValidationReport::Aborted(format!("Invalid JSON body: {}", e)),
        }
    };

    let mut request = Request::from_parts(parts, Body::from(bytes));
    if !report.is_valid() {
        tracing::debug!("Request body failed validation: {:?}", report);
        request.extensions_mut().insert(ValidationFailure(report));
    }

    Ok(next.run(request).await)
}

/// Rejects the request with the recorded validation failure, if any.
pub async fn handle_validation_error(request: Request, next: Next) -> Response {
    if let Some(ValidationFailure(report)) = request.extensions().get::<ValidationFailure>() {
        if let Some(err) = ApiError::validation_failed(report) {
            return err.into_response();
        }
    }
    next.run(request).await
}
