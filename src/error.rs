use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::data_models::Diagnostics;

/// Failures of the summarization endpoint. The `Display` text is exactly what
/// the caller sees; upstream detail never leaks into it.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Missing name")]
    MissingName,
    #[error("Missing OpenRouter API key")]
    MissingApiKey { diagnostics: Option<Diagnostics> },
    #[error("OpenRouter request failed (all models)")]
    AllModelsFailed { diagnostics: Option<Diagnostics> },
    #[error("Internal error")]
    Internal,
}

impl SummaryError {
    pub fn status(&self) -> StatusCode {
        match self {
            SummaryError::MissingName => StatusCode::BAD_REQUEST,
            SummaryError::MissingApiKey { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            SummaryError::AllModelsFailed { .. } => StatusCode::BAD_GATEWAY,
            SummaryError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            SummaryError::MissingApiKey { diagnostics }
            | SummaryError::AllModelsFailed { diagnostics } => diagnostics.as_ref(),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a Diagnostics>,
}

impl IntoResponse for SummaryError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            diagnostics: self.diagnostics(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("Name and email are required")]
    MissingFields,
    #[error("Server configuration error")]
    NotConfigured,
    #[error("Failed to save to database")]
    Upstream,
    #[error("Internal server error")]
    Internal,
}

impl LeadError {
    pub fn status(&self) -> StatusCode {
        match self {
            LeadError::MissingFields => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LeadError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            diagnostics: None,
        };
        (self.status(), Json(body)).into_response()
    }
}
