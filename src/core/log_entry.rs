//! Log record structure

use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use uuid::Uuid;

/// Textual timestamp layout: UTC, nanosecond precision, fixed width.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

/// Format a timestamp with [`TIMESTAMP_FORMAT`]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

mod fixed_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Source location a record is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub path: String,
    pub line: u32,
}

impl CallSite {
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Location of the code that called the current `#[track_caller]` chain
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// One immutable log record.
///
/// Severity is always derived from the status code and the message is fully
/// expanded before the record exists. Field order is the structured key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    #[serde(with = "fixed_timestamp")]
    timestamp: DateTime<Utc>,
    severity: Severity,
    id: Uuid,
    path: String,
    line: u32,
    status: u16,
    message: String,
}

impl Log {
    pub fn new(status: u16, message: impl Into<String>, site: CallSite) -> Self {
        Self {
            timestamp: Utc::now(),
            severity: Severity::classify(status),
            id: Uuid::new_v4(),
            path: site.path,
            line: site.line,
            status,
            message: message.into(),
        }
    }

    /// Correlation id shared with any error projected from this record
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn call_site(&self) -> CallSite {
        CallSite::new(self.path.clone(), self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_status() {
        let log = Log::new(503, "upstream down", CallSite::new("svc.rs", 10));
        assert_eq!(log.severity(), Severity::Critical);
        assert_eq!(log.status(), 503);
        assert_eq!(log.message(), "upstream down");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Log::new(200, "a", CallSite::new("a.rs", 1));
        let b = Log::new(200, "a", CallSite::new("a.rs", 1));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_caller_points_here() {
        let site = CallSite::caller();
        assert!(site.path.ends_with("log_entry.rs"));
        assert!(site.line > 0);
    }

    #[test]
    fn test_call_site_roundtrips_through_record() {
        let site = CallSite::new("src/jobs/sync.rs", 77);
        let log = Log::new(200, "synced", site.clone());

        assert_eq!(log.call_site(), site);
        assert_eq!(log.call_site().to_string(), "src/jobs/sync.rs:77");
    }

    #[test]
    fn test_timestamp_has_nanosecond_width() {
        let log = Log::new(200, "tick", CallSite::new("t.rs", 2));
        let text = format_timestamp(log.timestamp());
        // 2025-01-08T10:30:45.123456789Z
        assert_eq!(text.len(), 30);
        assert!(text.ends_with('Z'));
    }
}
