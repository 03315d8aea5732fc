//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Runs (result, duration, listings found)
//! - Platform drivers (calls by operation and status)
//! - Scoring and applications

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Run Metrics
// =============================================================================

/// Runs total by result.
pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("jobhound_runs_total", "Total pipeline runs"),
        &["result"], // "completed", "cancelled", "failed"
    )
    .unwrap()
});

/// Run duration in seconds.
pub static RUN_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("jobhound_run_duration_seconds", "Duration of a pipeline run")
            .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0]),
        &["result"],
    )
    .unwrap()
});

/// Unique listings found per run.
pub static LISTINGS_FOUND: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "jobhound_listings_found",
            "Number of unique listings found per run",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0]),
    )
    .unwrap()
});

// =============================================================================
// Driver Metrics
// =============================================================================

/// Driver calls by platform, operation and status.
pub static DRIVER_CALLS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("jobhound_driver_calls_total", "Total platform driver calls"),
        &["platform", "operation", "status"], // operation: "authenticate", "search", "submit"
    )
    .unwrap()
});

/// Listings returned per search call.
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "jobhound_search_results",
            "Number of listings returned per driver search call",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
    )
    .unwrap()
});

// =============================================================================
// Scoring and Application Metrics
// =============================================================================

/// Match score of every scored listing.
pub static MATCH_SCORES: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("jobhound_match_score", "Distribution of listing match scores")
            .buckets(vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]),
    )
    .unwrap()
});

/// Application outcomes by platform and status.
pub static APPLICATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("jobhound_applications_total", "Total application outcomes"),
        &["platform", "status"], // "applied", "failed", "skipped_no_driver"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Runs
        Box::new(RUNS_TOTAL.clone()),
        Box::new(RUN_DURATION.clone()),
        Box::new(LISTINGS_FOUND.clone()),
        // Drivers
        Box::new(DRIVER_CALLS.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        // Scoring / applications
        Box::new(MATCH_SCORES.clone()),
        Box::new(APPLICATIONS.clone()),
    ]
}
