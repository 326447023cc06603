//! Shared API types
//!
//! Error envelope used by every endpoint: `{"error", "code", "message"}`.

use axum::Json;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::data::DataError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    MethodNotAllowed { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn method_not_allowed(method: &Method) -> Self {
        Self::MethodNotAllowed {
            message: format!("Method {} not allowed", method),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        tracing::error!(
            error = %e,
            backend = e.backend(),
            transient = e.is_transient(),
            "Data error"
        );
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, code, message) = match self {
            Self::BadRequest { code, message } => ("bad_request", code, message),
            Self::NotFound { code, message } => ("not_found", code, message),
            Self::MethodNotAllowed { message } => (
                "method_not_allowed",
                "METHOD_NOT_ALLOWED".to_string(),
                message,
            ),
            Self::Internal { message } => ("internal_error", "INTERNAL".to_string(), message),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_envelope() {
        let resp = ApiError::bad_request("MISSING_TRACE_ID", "traceID is required").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "bad_request");
        assert_eq!(json["code"], "MISSING_TRACE_ID");
        assert_eq!(json["message"], "traceID is required");
    }

    #[tokio::test]
    async fn test_method_not_allowed_message() {
        let resp = ApiError::method_not_allowed(&Method::PUT).into_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(resp).await["message"], "Method PUT not allowed");
    }

    #[tokio::test]
    async fn test_data_error_hides_details() {
        let err = ApiError::from_data(DataError::from_sqlite(sqlx::Error::PoolClosed));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(resp).await;
        assert_eq!(json["code"], "INTERNAL");
        assert_eq!(json["message"], "Database operation failed");
    }
}
