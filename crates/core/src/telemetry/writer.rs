use std::sync::Arc;

use tokio::sync::mpsc;

use super::SearchTelemetry;
use crate::catalog::{CatalogStore, SearchRecord};
use crate::metrics;

/// Background task that receives search records and writes them to the catalog
pub struct TelemetryWriter {
    rx: mpsc::Receiver<SearchRecord>,
    store: Arc<dyn CatalogStore>,
}

impl TelemetryWriter {
    /// Create a new telemetry writer
    pub fn new(rx: mpsc::Receiver<SearchRecord>, store: Arc<dyn CatalogStore>) -> Self {
        Self { rx, store }
    }

    /// Run the writer, consuming records until every handle is dropped
    ///
    /// This should be spawned as a background task. Failed writes are logged
    /// and skipped; nothing is retried.
    pub async fn run(mut self) {
        tracing::info!("Telemetry writer started");

        while let Some(record) = self.rx.recv().await {
            match self.store.insert_search_record(&record) {
                Ok(()) => {
                    metrics::TELEMETRY_RECORDS
                        .with_label_values(&["written"])
                        .inc();
                }
                Err(e) => {
                    tracing::warn!(keyword = %record.keyword, "Failed to write search record: {}", e);
                    metrics::TELEMETRY_RECORDS
                        .with_label_values(&["failed"])
                        .inc();
                }
            }
        }

        tracing::info!("Telemetry writer shutting down");
    }
}

/// Create a complete telemetry system
///
/// Returns:
/// - `SearchTelemetry` - for enqueueing records (clone this to share across tasks)
/// - `TelemetryWriter` - spawn this as a background task with `tokio::spawn(writer.run())`
///
/// # Arguments
/// * `store` - The catalog the records are written to
/// * `buffer_size` - Size of the channel buffer (records are dropped when full)
pub fn create_telemetry_system(
    store: Arc<dyn CatalogStore>,
    buffer_size: usize,
) -> (SearchTelemetry, TelemetryWriter) {
    let (tx, rx) = mpsc::channel(buffer_size);
    let telemetry = SearchTelemetry::new(tx);
    let writer = TelemetryWriter::new(rx, store);
    (telemetry, writer)
}
