//! Search suggestion handlers.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::envelope::{success, ApiError, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionData {
    pub suggestions: Vec<String>,
}

/// GET /api/v1/search/suggestions
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SuggestionParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SuggestionData>>, ApiError> {
    let Query(params) = params?;
    let suggestions = state.search().suggest(&params.q)?;
    Ok(success(SuggestionData { suggestions }))
}
