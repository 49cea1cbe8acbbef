//! Error types for event admission
//!
//! Errors produced while deciding whether a binlog event is admitted.
//! Classified the same way as the rest of the CDC stack so callers can
//! route them into metrics and alerting.

use crate::common::pattern::PatternError;
use crate::common::rule::FilterError;
use crate::mysql::BinlogEventType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error categories for metrics and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Replication stream errors (unexpected binlog events)
    Replication,
    /// Rule filter evaluation errors
    Filter,
    /// Configuration errors (invalid rules, patterns)
    Configuration,
}

/// Admission errors
#[derive(Error, Debug)]
pub enum AdmissionError {
    /// The binlog event rule filter failed while evaluating an event
    #[error("binlog event filter error: {context}: {source}")]
    BinlogEventFilter {
        /// The SQL/table/event that triggered the failure
        context: String,
        #[source]
        source: FilterError,
    },

    /// A row event arrived with a type that is not insert/update/delete
    #[error("invalid replication event type {0}")]
    InvalidReplicaEvent(BinlogEventType),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid table pattern
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
}

impl AdmissionError {
    /// Wrap a rule filter failure with the event that triggered it.
    pub fn binlog_event_filter(source: FilterError, context: impl Into<String>) -> Self {
        Self::BinlogEventFilter {
            context: context.into(),
            source,
        }
    }

    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Admission errors are never transient: the same event evaluated
    /// against the same rules fails the same way.
    pub fn is_retriable(&self) -> bool {
        false
    }

    /// Get the error category for metrics and alerting.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BinlogEventFilter { .. } => ErrorCategory::Filter,
            Self::InvalidReplicaEvent(_) => ErrorCategory::Replication,
            Self::Config(_) | Self::Pattern(_) => ErrorCategory::Configuration,
        }
    }

    /// Get a metric-safe error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BinlogEventFilter { .. } => "binlog_event_filter",
            Self::InvalidReplicaEvent(_) => "invalid_replica_event",
            Self::Config(_) => "config_error",
            Self::Pattern(_) => "pattern_error",
        }
    }
}

/// Result type for admission operations
pub type Result<T> = std::result::Result<T, AdmissionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::EventKind;

    #[test]
    fn test_error_display() {
        let err = AdmissionError::binlog_event_filter(
            FilterError::InvalidEventKind(EventKind::AllDml),
            "skip query DROP TABLE t1",
        );
        let msg = err.to_string();
        assert!(msg.contains("binlog event filter error"));
        assert!(msg.contains("skip query DROP TABLE t1"));
        assert!(msg.contains("all dml"));
    }

    #[test]
    fn test_invalid_replica_event_display() {
        let err = AdmissionError::InvalidReplicaEvent(BinlogEventType::QueryEvent);
        assert_eq!(err.to_string(), "invalid replication event type QueryEvent");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let err = AdmissionError::binlog_event_filter(
            FilterError::engine("matcher unavailable"),
            "skip row event",
        );
        let source = err.source().expect("filter error is the source");
        assert!(source.to_string().contains("matcher unavailable"));
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AdmissionError::InvalidReplicaEvent(BinlogEventType::Unknown).category(),
            ErrorCategory::Replication
        );
        assert_eq!(
            AdmissionError::config("x").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            AdmissionError::binlog_event_filter(FilterError::engine("x"), "y").category(),
            ErrorCategory::Filter
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(AdmissionError::config("x").error_code(), "config_error");
        assert_eq!(
            AdmissionError::InvalidReplicaEvent(BinlogEventType::Unknown).error_code(),
            "invalid_replica_event"
        );
        assert!(!AdmissionError::config("x").is_retriable());
    }
}
