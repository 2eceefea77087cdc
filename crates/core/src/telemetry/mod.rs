//! Best-effort search log.
//!
//! Request handlers enqueue [`SearchRecord`](crate::catalog::SearchRecord)s
//! through a [`SearchTelemetry`] handle without waiting; a single
//! [`TelemetryWriter`] task drains them into the catalog.

mod handle;
mod writer;

pub use handle::*;
pub use writer::*;
