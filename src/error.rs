use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::llm::ProviderError;
use crate::stages::NormalizeError;
use crate::store::StoreError;

/// Failure of an analyzer operation, as seen by callers
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("AI provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("interview {0} not found")]
    NotFound(String),
    #[error("not authorized to view this interview")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AnalysisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::Normalize(_) => StatusCode::BAD_REQUEST,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-facing label for the `error` field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) | Self::Normalize(_) => "invalid_input",
            Self::Provider(_) => "provider_error",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Store(_) => "store_error",
        }
    }
}

/// Unreadable request bodies answer with the same envelope as other input errors
impl From<JsonRejection> for AnalysisError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.kind(),
            "message": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AnalysisError::from(NormalizeError::EmptyHistory).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalysisError::from(ProviderError::EmptyResponse).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AnalysisError::NotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AnalysisError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AnalysisError::from(StoreError::Unavailable("down".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_carries_status() {
        let response = AnalysisError::InvalidInput("jobId is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
