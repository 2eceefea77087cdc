//! Category API handlers.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use pansearch_core::CategorySummary;

use super::envelope::{success, ApiError, ApiResponse};
use super::resources::ListData;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryItem {
    pub value: String,
    pub label: String,
    pub count: u64,
    pub icon: String,
}

impl From<CategorySummary> for CategoryItem {
    fn from(summary: CategorySummary) -> Self {
        Self {
            value: summary.category.value,
            label: summary.category.label,
            count: summary.count,
            icon: summary.category.icon,
        }
    }
}

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ListData<CategoryItem>>>, ApiError> {
    let categories = state.search().categories()?;

    Ok(success(ListData {
        list: categories.into_iter().map(CategoryItem::from).collect(),
    }))
}
