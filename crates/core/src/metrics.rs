//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Search engine (searches, result sizes, suggestions)
//! - Download recording and help requests
//! - Search telemetry (written and dropped records)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Search Metrics
// =============================================================================

/// Searches executed total by sort mode.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pansearch_searches_total", "Total searches executed"),
        &["sort"], // "relevance", "time", "size"
    )
    .unwrap()
});

/// Matching resources per search (total, not page length).
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "pansearch_search_results",
            "Number of resources matching a search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0]),
    )
    .unwrap()
});

/// Suggestion lists served total.
pub static SUGGESTIONS_SERVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pansearch_suggestions_served_total",
        "Total suggestion lists built",
    )
    .unwrap()
});

// =============================================================================
// Download & Request Metrics
// =============================================================================

/// Download recording attempts by result.
pub static DOWNLOADS_RECORDED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pansearch_downloads_recorded_total",
            "Total download recording attempts",
        ),
        &["result"], // "recorded", "not_found", "failed"
    )
    .unwrap()
});

/// Help requests accepted total.
pub static HELP_REQUESTS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pansearch_help_requests_submitted_total",
        "Total help requests accepted",
    )
    .unwrap()
});

// =============================================================================
// Telemetry Metrics
// =============================================================================

/// Search log records by outcome.
pub static TELEMETRY_RECORDS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pansearch_telemetry_records_total",
            "Search log records by outcome",
        ),
        &["result"], // "written", "dropped", "failed"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        Box::new(SUGGESTIONS_SERVED.clone()),
        // Downloads & requests
        Box::new(DOWNLOADS_RECORDED.clone()),
        Box::new(HELP_REQUESTS_SUBMITTED.clone()),
        // Telemetry
        Box::new(TELEMETRY_RECORDS.clone()),
    ]
}
