//! Help request API handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use pansearch_core::{HelpRequestReceipt, NewHelpRequest};

use super::envelope::{success, ApiError, ApiResponse};
use crate::state::AppState;

/// POST /api/v1/requests
pub async fn submit_request(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewHelpRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<HelpRequestReceipt>>, ApiError> {
    let Json(body) = body?;
    let receipt = state.help_desk().submit(&body)?;
    Ok(success(receipt))
}
