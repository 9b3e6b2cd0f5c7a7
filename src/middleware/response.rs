use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Page metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

/// Wrapper for API responses that automatically adds success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: Option<String>,
    pub pagination: Option<PaginationInfo>,
    /// Emit an explicit `"error": false` alongside the data.
    pub error_flag: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            message: None,
            pagination: None,
            error_flag: false,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationInfo) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_error_flag(mut self) -> Self {
        self.error_flag = true;
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        // Convert data to JSON Value for consistent envelope format
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": true,
                        "message": "Failed to serialize response data",
                        "code": "INTERNAL_SERVER_ERROR"
                    })),
                )
                    .into_response();
            }
        };

        // Wrap in success envelope
        let mut envelope = json!({
            "success": true,
            "data": data_value
        });
        if let Some(pagination) = self.pagination {
            envelope["pagination"] = json!(pagination);
        }
        if let Some(message) = self.message {
            envelope["message"] = json!(message);
        }
        if self.error_flag {
            envelope["error"] = json!(false);
        }

        (StatusCode::OK, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_serializes_in_camel_case() {
        let info = PaginationInfo {
            total_items: 25,
            total_pages: 3,
            current_page: 2,
        };
        assert_eq!(
            serde_json::to_value(info).unwrap(),
            json!({"totalItems": 25, "totalPages": 3, "currentPage": 2})
        );
    }
}
