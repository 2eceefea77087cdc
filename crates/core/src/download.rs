//! Download recording.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogError, CatalogStore, DownloadRecord};
use crate::metrics;

/// How long a download receipt advertises the link as good for.
/// Advisory only; nothing expires the URL or the record.
pub const DOWNLOAD_LINK_TTL_HOURS: i64 = 24;

/// Who is downloading.
#[derive(Debug, Clone, Default)]
pub struct DownloadRequest {
    pub user_id: String,
    pub user_agent: String,
    pub ip_address: String,
}

/// Result of a recorded download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadReceipt {
    pub download_id: String,
    pub resource_id: String,
    pub download_url: String,
    pub expire_time: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(CatalogError),
}

impl From<CatalogError> for DownloadError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(id) => DownloadError::NotFound(id),
            other => DownloadError::Store(other),
        }
    }
}

/// Logs downloads and keeps each resource's download counter in step.
pub struct DownloadRecorder {
    store: Arc<dyn CatalogStore>,
}

impl DownloadRecorder {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Record one download of `resource_id`.
    ///
    /// The counter is bumped by the store in a single update, so concurrent
    /// downloads of the same resource are all counted.
    pub fn record(
        &self,
        resource_id: &str,
        request: &DownloadRequest,
    ) -> Result<DownloadReceipt, DownloadError> {
        let result = self.record_inner(resource_id, request);

        let outcome = match &result {
            Ok(_) => "recorded",
            Err(DownloadError::NotFound(_)) => "not_found",
            Err(DownloadError::Store(_)) => "failed",
        };
        metrics::DOWNLOADS_RECORDED
            .with_label_values(&[outcome])
            .inc();

        result
    }

    fn record_inner(
        &self,
        resource_id: &str,
        request: &DownloadRequest,
    ) -> Result<DownloadReceipt, DownloadError> {
        let resource = self.store.get_resource(resource_id)?;

        let now = Utc::now();
        let record = DownloadRecord {
            id: format!("dl_{}", uuid::Uuid::new_v4().simple()),
            resource_id: resource.id.clone(),
            user_id: request.user_id.clone(),
            user_agent: request.user_agent.clone(),
            ip_address: request.ip_address.clone(),
            download_time: now,
        };

        self.store.record_download(&record)?;

        tracing::info!(
            resource_id = %resource.id,
            download_id = %record.id,
            user_id = %record.user_id,
            "Download recorded"
        );

        Ok(DownloadReceipt {
            download_id: record.id,
            resource_id: resource.id,
            download_url: resource.download_url,
            expire_time: now + Duration::hours(DOWNLOAD_LINK_TTL_HOURS),
        })
    }
}
