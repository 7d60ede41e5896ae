//! Metrics for the layer pipeline.
//!
//! Recording goes through the `metrics` facade. Nothing is exported unless the
//! embedding program installs a recorder; without one every call is a no-op.

use std::fmt;

/// All metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Registry (bronze source) metrics
    RegistryRequestsSuccess,
    RegistryRequestsError,
    RegistryRequestDuration,
    RegistryPayloadBytes,

    // Stage metrics
    StageRowsRead,
    StageRowsWritten,
    StageDuration,
    StageSuccess,
    StageError,
    GoldTimestampsEmptied,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RegistryRequestsSuccess => "stellar_registry_requests_success_total",
            MetricName::RegistryRequestsError => "stellar_registry_requests_error_total",
            MetricName::RegistryRequestDuration => "stellar_registry_request_duration_seconds",
            MetricName::RegistryPayloadBytes => "stellar_registry_payload_bytes",
            MetricName::StageRowsRead => "stellar_stage_rows_read_total",
            MetricName::StageRowsWritten => "stellar_stage_rows_written_total",
            MetricName::StageDuration => "stellar_stage_duration_seconds",
            MetricName::StageSuccess => "stellar_stage_success_total",
            MetricName::StageError => "stellar_stage_error_total",
            MetricName::GoldTimestampsEmptied => "stellar_gold_timestamps_emptied_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod registry {
    use super::MetricName;
    use std::time::Duration;

    /// Record a successful TAP request
    pub fn request_success(payload_bytes: usize, elapsed: Duration) {
        ::metrics::counter!(MetricName::RegistryRequestsSuccess.as_str()).increment(1);
        ::metrics::histogram!(MetricName::RegistryPayloadBytes.as_str()).record(payload_bytes as f64);
        ::metrics::histogram!(MetricName::RegistryRequestDuration.as_str())
            .record(elapsed.as_secs_f64());
    }

    /// Record a failed TAP request
    pub fn request_error() {
        ::metrics::counter!(MetricName::RegistryRequestsError.as_str()).increment(1);
    }
}

pub mod stage {
    use super::MetricName;
    use std::time::Duration;

    pub fn rows_read(stage: &'static str, rows: usize) {
        ::metrics::counter!(MetricName::StageRowsRead.as_str(), "stage" => stage).increment(rows as u64);
    }

    pub fn rows_written(stage: &'static str, rows: usize) {
        ::metrics::counter!(MetricName::StageRowsWritten.as_str(), "stage" => stage)
            .increment(rows as u64);
    }

    /// Record a finished stage run and how long it took
    pub fn completed(stage: &'static str, elapsed: Duration) {
        ::metrics::counter!(MetricName::StageSuccess.as_str(), "stage" => stage).increment(1);
        ::metrics::histogram!(MetricName::StageDuration.as_str(), "stage" => stage)
            .record(elapsed.as_secs_f64());
    }

    pub fn failed(stage: &'static str) {
        ::metrics::counter!(MetricName::StageError.as_str(), "stage" => stage).increment(1);
    }

    pub fn timestamps_emptied(count: usize) {
        ::metrics::counter!(MetricName::GoldTimestampsEmptied.as_str()).increment(count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed_and_unique() {
        let all = [
            MetricName::RegistryRequestsSuccess,
            MetricName::RegistryRequestsError,
            MetricName::RegistryRequestDuration,
            MetricName::RegistryPayloadBytes,
            MetricName::StageRowsRead,
            MetricName::StageRowsWritten,
            MetricName::StageDuration,
            MetricName::StageSuccess,
            MetricName::StageError,
            MetricName::GoldTimestampsEmptied,
        ];
        let names: std::collections::HashSet<_> = all.iter().map(|m| m.to_string()).collect();
        assert_eq!(names.len(), all.len());
        assert!(names.iter().all(|n| n.starts_with("stellar_")));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        stage::rows_read("silver", 3);
        stage::completed("silver", std::time::Duration::from_millis(5));
        registry::request_error();
    }
}
