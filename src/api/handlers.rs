use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::de::DeserializeOwned;

use crate::data_models::{LeadReceipt, SummaryResponse};
use crate::error::{LeadError, SummaryError};

use super::AppState;
use super::models::{LeadBody, SummarizeBody};

/// An empty summarize body reads as `{}`; anything else must be valid JSON.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> serde_json::Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
}

pub async fn summarize_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SummaryResponse>, SummaryError> {
    let body: SummarizeBody = parse_body(&body).map_err(|e| {
        tracing::error!("summarize request body rejected: {}", e);
        SummaryError::Internal
    })?;

    let response = state.pipeline.summarize(&body.into()).await?;
    Ok(Json(response))
}

pub async fn submit_lead_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LeadReceipt>, LeadError> {
    let body: LeadBody = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("error submitting lead: {}", e);
        LeadError::Internal
    })?;

    let receipt = state.leads.submit(&body.into()).await?;
    Ok(Json(receipt))
}
