//! Entities held by the resource catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared file hosted elsewhere, as indexed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Opaque identifier.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Human readable size as published (e.g. "1.2GB").
    pub size: String,
    /// Type tag (e.g. "video", "archive").
    #[serde(rename = "type")]
    pub resource_type: String,
    pub category_id: i64,
    /// Hosting source label (e.g. "Baidu Pan").
    pub source: String,
    pub download_url: String,
    pub extract_code: Option<String>,
    pub file_count: u32,
    pub view_count: u64,
    pub download_count: u64,
    /// Only valid resources are ever listed.
    pub valid: bool,
    /// Informational; nothing invalidates a resource when this passes.
    pub expire_time: Option<DateTime<Utc>>,
    pub upload_time: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl Resource {
    /// A valid resource with zeroed counters, uploaded now.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category_id: i64,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            size: String::new(),
            resource_type: String::new(),
            category_id,
            source: String::new(),
            download_url: download_url.into(),
            extract_code: None,
            file_count: 1,
            view_count: 0,
            download_count: 0,
            valid: true,
            expire_time: None,
            upload_time: Utc::now(),
            tags: Vec::new(),
        }
    }
}

/// A resource together with the label of its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedResource {
    pub resource: Resource,
    /// Empty when the category row is missing.
    pub category_label: String,
}

/// Browsing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// Stable key used by the `category` search filter.
    pub value: String,
    pub label: String,
    pub icon: String,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Category to insert; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub value: String,
    pub label: String,
    pub icon: String,
    pub sort_order: i32,
    pub is_active: bool,
}

impl NewCategory {
    pub fn new(value: impl Into<String>, label: impl Into<String>, sort_order: i32) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            icon: String::new(),
            sort_order,
            is_active: true,
        }
    }
}

/// One executed search, written by search telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub keyword: String,
    /// Category filter as sent by the client.
    pub category: String,
    pub sort_by: String,
    /// Empty for anonymous searches.
    pub user_id: String,
    pub ip_address: String,
    pub user_agent: String,
    pub result_count: u64,
    pub search_time: DateTime<Utc>,
}

/// One recorded download. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub id: String,
    pub resource_id: String,
    pub user_id: String,
    pub user_agent: String,
    pub ip_address: String,
    pub download_time: DateTime<Utc>,
}

/// How the requester of a missing resource wants to be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    Email,
    Phone,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactType::Email => "email",
            ContactType::Phone => "phone",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(ContactType::Email),
            "phone" => Some(ContactType::Phone),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpRequestStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
}

impl HelpRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HelpRequestStatus::Pending => "pending",
            HelpRequestStatus::Processing => "processing",
            HelpRequestStatus::Completed => "completed",
            HelpRequestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(HelpRequestStatus::Pending),
            "processing" => Some(HelpRequestStatus::Processing),
            "completed" => Some(HelpRequestStatus::Completed),
            "rejected" => Some(HelpRequestStatus::Rejected),
            _ => None,
        }
    }
}

/// A user's request for a resource the catalog does not have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: String,
    pub resource_name: String,
    pub resource_type: String,
    pub description: String,
    pub contact: String,
    pub contact_type: ContactType,
    pub status: HelpRequestStatus,
    pub admin_notes: Option<String>,
    pub completed_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Database(e.to_string())
    }
}
