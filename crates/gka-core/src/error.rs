use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Cross-cutting rejections (session middleware, extractors).
///
/// Services define their own domain error enums; every error body has the
/// same `{success: false, kind, message}` shape via [`error_body`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

/// JSON error body shared by every service error type.
pub fn error_body(kind: &str, message: String) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "kind": kind,
        "message": message,
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer records every request; only 500s get an error line here.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = error_body(self.kind(), self.to_string());
        (status, axum::Json(body)).into_response()
    }
}
