pub mod auth;
pub mod response;
pub mod validation;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult, PaginationInfo};
pub use validation::{handle_validation_error, validate_input_middleware, InputRules, ValidationFailure};
