use tokio::sync::mpsc;

use crate::catalog::SearchRecord;
use crate::metrics;

/// Handle for enqueueing search log records.
///
/// This is cheaply cloneable and can be shared across tasks.
/// Records are sent through a bounded channel to be written by the
/// `TelemetryWriter`. Enqueueing never waits and never fails the caller.
#[derive(Clone)]
pub struct SearchTelemetry {
    tx: Option<mpsc::Sender<SearchRecord>>,
}

impl SearchTelemetry {
    /// Create a telemetry handle from a channel sender
    pub fn new(tx: mpsc::Sender<SearchRecord>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A handle that discards every record.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Try to enqueue a record without blocking
    ///
    /// Returns true if the record was queued. A full or closed channel drops
    /// the record with a warning.
    pub fn try_record(&self, record: SearchRecord) -> bool {
        let Some(ref tx) = self.tx else {
            return false;
        };

        match tx.try_send(record) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dropped search record: {}", e);
                metrics::TELEMETRY_RECORDS
                    .with_label_values(&["dropped"])
                    .inc();
                false
            }
        }
    }
}
