use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Every non-2xx response leaves through here.
#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<String>),
    Unauthorized(String),
    Conflict(String),
    Internal(String),
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    /// A string, or a list of strings for validation failures.
    #[schema(value_type = Object)]
    pub message: serde_json::Value,
    pub error: &'static str,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(vec![message.into()])
    }

    pub fn internal() -> Self {
        ApiError::Internal("Internal server error".into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Validation(messages) => serde_json::json!(messages),
            ApiError::Unauthorized(m) | ApiError::Conflict(m) | ApiError::Internal(m) => {
                serde_json::Value::String(m)
            }
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
            error: status.canonical_reason().unwrap_or("Error"),
        };
        (status, Json(body)).into_response()
    }
}
