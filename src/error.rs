use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::translate::TranslationError;

/// Errors surfaced by the HTTP handlers, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing parameters. Please provide 'text', 'source_lang', and 'target_lang'.")]
    MissingParameters,

    #[error(transparent)]
    Translation(#[from] TranslationError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameters => StatusCode::BAD_REQUEST,
            ApiError::Translation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Translation(err) = &self {
            warn!("Translation failed for {}: {}", err.subject(), err);
        }
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(ApiError::MissingParameters.status_code(), StatusCode::BAD_REQUEST);
        let err: ApiError = TranslationError::pair_unavailable("hi", "de").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Translation model not available.");
    }
}
