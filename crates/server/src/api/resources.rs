//! Resource API handlers: search, hot list and download recording.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use pansearch_core::search::Pagination;
use pansearch_core::{DownloadReceipt, DownloadRequest, HotResource, ListedResource, SearchRequest};

use super::envelope::{success, ApiError, ApiResponse};
use super::middleware::{AuthUser, RequestClient};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for `GET /resources/search`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query parameters for `GET /resources/hot`
///
/// `limit` stays a string so that garbage falls back to the default
/// instead of failing the request.
#[derive(Debug, Deserialize)]
pub struct HotParams {
    pub limit: Option<String>,
}

/// Request body for `POST /resources/{id}/download`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBody {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub ip: String,
}

/// Resource as listed by search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub size: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Category label
    pub category: String,
    pub source: String,
    pub download_url: String,
    pub extract_code: String,
    pub upload_time: DateTime<Utc>,
    pub file_count: u32,
    pub view_count: u64,
    pub download_count: u64,
    pub tags: Vec<String>,
    pub valid: bool,
    pub expire_time: Option<DateTime<Utc>>,
}

impl From<ListedResource> for ResourceItem {
    fn from(listed: ListedResource) -> Self {
        let r = listed.resource;
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            size: r.size,
            resource_type: r.resource_type,
            category: listed.category_label,
            source: r.source,
            download_url: r.download_url,
            extract_code: r.extract_code.unwrap_or_default(),
            upload_time: r.upload_time,
            file_count: r.file_count,
            view_count: r.view_count,
            download_count: r.download_count,
            tags: r.tags,
            valid: r.valid,
            expire_time: r.expire_time,
        }
    }
}

/// Entry of the hot list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotItem {
    pub id: String,
    pub rank: u32,
    pub title: String,
    pub description: String,
    pub size: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub category: String,
    /// View count of the resource
    pub search_count: u64,
}

impl From<HotResource> for HotItem {
    fn from(hot: HotResource) -> Self {
        let r = hot.listed.resource;
        Self {
            id: r.id,
            rank: hot.rank,
            title: r.title,
            description: r.description,
            size: r.size,
            resource_type: r.resource_type,
            category: hot.listed.category_label,
            search_count: r.view_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageData<T> {
    pub list: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct ListData<T> {
    pub list: Vec<T>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/resources/search
pub async fn search(
    State(state): State<Arc<AppState>>,
    RequestClient(client): RequestClient,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<PageData<ResourceItem>>>, ApiError> {
    let Query(params) = params?;

    let request = SearchRequest {
        query: params.q,
        category: params.category,
        sort: params.sort,
        page: params.page,
        page_size: params.page_size,
    };

    let page = state.search().search(&request, &client)?;

    Ok(success(PageData {
        list: page.list.into_iter().map(ResourceItem::from).collect(),
        pagination: page.pagination,
    }))
}

/// GET /api/v1/resources/hot
pub async fn hot(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HotParams>, QueryRejection>,
) -> Result<Json<ApiResponse<ListData<HotItem>>>, ApiError> {
    let Query(params) = params?;
    let limit = params
        .limit
        .as_deref()
        .and_then(|l| l.trim().parse::<i64>().ok());

    let hot = state.search().hot(limit)?;

    Ok(success(ListData {
        list: hot.into_iter().map(HotItem::from).collect(),
    }))
}

/// POST /api/v1/resources/{id}/download
///
/// Empty payload fields fall back to the authenticated user and the
/// request's own client details.
pub async fn record_download(
    State(state): State<Arc<AppState>>,
    Path(resource_id): Path<String>,
    AuthUser(identity): AuthUser,
    RequestClient(client): RequestClient,
    body: Result<Json<DownloadBody>, JsonRejection>,
) -> Result<Json<ApiResponse<DownloadReceipt>>, ApiError> {
    let Json(body) = body?;

    if resource_id.trim().is_empty() {
        return Err(ApiError::bad_request("Resource id is required"));
    }

    let user_id = if body.user_id.is_empty() && !identity.is_anonymous() {
        identity.user_id
    } else {
        body.user_id
    };

    let request = DownloadRequest {
        user_id,
        user_agent: non_empty_or(body.user_agent, client.user_agent),
        ip_address: non_empty_or(body.ip, client.ip_address),
    };

    let receipt = state.downloads().record(&resource_id, &request)?;
    Ok(success(receipt))
}

fn non_empty_or(value: String, fallback: String) -> String {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
