//! Help requests for resources missing from the catalog.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, CatalogStore, ContactType, HelpRequest, HelpRequestStatus};
use crate::metrics;

/// Processing estimate quoted to every requester.
pub const ESTIMATED_PROCESS_TIME: &str = "1-3 business days";

/// A help request as submitted by a user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHelpRequest {
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub contact_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequestReceipt {
    pub request_id: String,
    pub status: HelpRequestStatus,
    pub submit_time: DateTime<Utc>,
    pub estimated_process_time: String,
}

#[derive(Debug, Error)]
pub enum HelpRequestError {
    #[error("Invalid help request: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] CatalogError),
}

/// Accepts help requests and files them as pending.
pub struct HelpDesk {
    store: Arc<dyn CatalogStore>,
}

impl HelpDesk {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub fn submit(&self, new: &NewHelpRequest) -> Result<HelpRequestReceipt, HelpRequestError> {
        let contact_type = validate(new)?;

        let now = Utc::now();
        let request = HelpRequest {
            id: format!("req_{}", uuid::Uuid::new_v4().simple()),
            resource_name: new.resource_name.trim().to_string(),
            resource_type: new.resource_type.clone(),
            description: new.description.clone(),
            contact: new.contact.trim().to_string(),
            contact_type,
            status: HelpRequestStatus::Pending,
            admin_notes: None,
            completed_time: None,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_help_request(&request)?;
        metrics::HELP_REQUESTS_SUBMITTED.inc();
        tracing::info!(request_id = %request.id, "Help request submitted");

        Ok(HelpRequestReceipt {
            request_id: request.id,
            status: request.status,
            submit_time: now,
            estimated_process_time: ESTIMATED_PROCESS_TIME.to_string(),
        })
    }
}

fn validate(new: &NewHelpRequest) -> Result<ContactType, HelpRequestError> {
    if new.resource_name.trim().is_empty() {
        return Err(HelpRequestError::Validation(
            "resourceName is required".to_string(),
        ));
    }
    if new.contact.trim().is_empty() {
        return Err(HelpRequestError::Validation(
            "contact is required".to_string(),
        ));
    }
    ContactType::parse(new.contact_type.trim()).ok_or_else(|| {
        HelpRequestError::Validation("contactType must be email or phone".to_string())
    })
}
