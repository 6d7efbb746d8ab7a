//! Response envelope and error mapping shared by all handlers

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Uniform JSON envelope: `{"success": bool, "data": …, "error": "…"}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Plain confirmation payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error half of every handler result.
pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);

/// Handler result carrying the envelope on both sides.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError<T>>;

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) | DomainError::InsufficientData(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error onto the envelope. Storage failures are logged and
/// answered with a generic message.
pub fn domain_error<T>(err: DomainError) -> ApiError<T> {
    let status = status_for(&err);
    let message = match &err {
        DomainError::Storage(detail) => {
            tracing::error!(error = %detail, "Storage failure while serving request");
            "Internal server error".to_string()
        }
        DomainError::Unauthorized(msg)
        | DomainError::Forbidden(msg)
        | DomainError::Conflict(msg)
        | DomainError::InsufficientData(msg)
        | DomainError::Validation(msg) => msg.clone(),
        DomainError::NotFound { .. } => err.to_string(),
    };
    (status, Json(ApiResponse::error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            status_for(&DomainError::not_found_by_id("Customer", "x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DomainError::InsufficientData("no consumption".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&DomainError::Forbidden("nope".into())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn storage_detail_is_not_exposed() {
        let (status, Json(body)) =
            domain_error::<()>(DomainError::Storage("connection refused at 10.0.0.3".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn envelope_omits_error_on_success() {
        let json = serde_json::to_value(ApiResponse::success(MessageResponse::new("ok"))).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["message"], "ok");
        assert!(json.get("error").is_none());
    }
}
