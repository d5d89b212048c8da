use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::ErrorResponse;

pub const NO_MATCH_MESSAGE: &str = "No model found. Try 'gpt' or 'llama'.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("{}", NO_MATCH_MESSAGE)]
    NoMatch,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match self {
            SearchError::NoMatch => StatusCode::NOT_FOUND,
        };
        let error_response = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(error_response)).into_response()
    }
}

/// Invalid catalog configuration, reported at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog entry has an empty model name")]
    EmptyName,
    #[error("catalog entry '{0}' has an empty link")]
    EmptyLink(String),
    #[error("duplicate model name '{0}' in catalog")]
    DuplicateName(String),
}
