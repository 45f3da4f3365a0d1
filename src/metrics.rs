//! Pipeline metrics.
//!
//! Counters and histograms are recorded through the `metrics` facade. Nothing is
//! exported until `init_metrics` installs the Prometheus recorder; before that the
//! macros are no-ops, which keeps library use and tests side-effect free.

use ::metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{info, warn};

pub const PIPELINE_RUNS: &str = "showmap_pipeline_runs_total";
pub const PIPELINE_FAILURES: &str = "showmap_pipeline_failures_total";
pub const PIPELINE_DURATION: &str = "showmap_pipeline_duration_seconds";
pub const EVENTS_FETCHED: &str = "showmap_events_fetched_total";
pub const EVENTS_REJECTED: &str = "showmap_events_rejected_total";
pub const LOOKUPS: &str = "showmap_artist_lookups_total";
pub const FEATURES_EMITTED: &str = "showmap_features_emitted_total";

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder once and keep a handle for in-process rendering.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if let Some(handle) = HANDLE.get() {
        return Some(handle);
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_all();
            info!("Prometheus recorder installed");
            Some(HANDLE.get_or_init(|| handle))
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

/// Prometheus text exposition, empty when no recorder is installed.
pub fn render() -> String {
    HANDLE.get().map(|h| h.render()).unwrap_or_default()
}

fn describe_all() {
    describe_counter!(PIPELINE_RUNS, "Pipeline invocations");
    describe_counter!(PIPELINE_FAILURES, "Pipeline invocations that returned an error");
    describe_histogram!(PIPELINE_DURATION, "Wall time of a pipeline invocation");
    describe_counter!(EVENTS_FETCHED, "Raw events returned by the event source");
    describe_counter!(EVENTS_REJECTED, "Raw events dropped by validation");
    describe_counter!(LOOKUPS, "Artist catalog lookups by outcome");
    describe_counter!(FEATURES_EMITTED, "Features written to collections");
}

/// Outcome of one artist lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Hit,
    Miss,
    Error,
    Timeout,
}

impl LookupOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Error => "error",
            Self::Timeout => "timeout",
        }
    }
}

pub struct PipelineMetrics;

impl PipelineMetrics {
    pub fn record_run() {
        counter!(PIPELINE_RUNS).increment(1);
    }

    pub fn record_failure(kind: &'static str) {
        counter!(PIPELINE_FAILURES, "kind" => kind).increment(1);
    }

    pub fn record_fetched(total: usize, rejected: usize) {
        counter!(EVENTS_FETCHED).increment(total as u64);
        counter!(EVENTS_REJECTED).increment(rejected as u64);
    }

    pub fn record_lookup(outcome: LookupOutcome) {
        counter!(LOOKUPS, "outcome" => outcome.as_str()).increment(1);
    }

    pub fn record_features(count: usize) {
        counter!(FEATURES_EMITTED).increment(count as u64);
    }
}

/// Records elapsed seconds to a histogram when dropped.
pub struct TimingGuard {
    start: Instant,
    histogram_name: &'static str,
}

impl TimingGuard {
    pub fn new(histogram_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            histogram_name,
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        histogram!(self.histogram_name).record(self.start.elapsed().as_secs_f64());
    }
}
