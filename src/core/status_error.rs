//! User-facing errors projected from log records

use super::log_entry::Log;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Message exposed in place of the real one for server-side failures
pub const INTERNAL_ERROR: &str = "internal error";

/// Statuses at or above this value are redacted
pub const REDACTION_THRESHOLD: u16 = 500;

/// Whether `err`'s message contains any of `needles`
pub fn contains_any<E, S>(err: &E, needles: &[S]) -> bool
where
    E: fmt::Display + ?Sized,
    S: AsRef<str>,
{
    let message = err.to_string();
    needles.iter().any(|n| message.contains(n.as_ref()))
}

/// Redacted, correlatable error derived from a [`Log`].
///
/// Only the correlation id and a stable message cross the response boundary
/// for statuses >= 500; the full text stays in the sink, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusError {
    id: Uuid,
    status: u16,
    #[serde(rename = "error")]
    message: String,
}

impl StatusError {
    /// Project `log` with the effective `status`.
    ///
    /// The placeholder text is reserved for redacted errors: a client-side
    /// message that equals it is exposed quoted.
    pub fn from_log(log: &Log, status: u16) -> Self {
        let message = if status >= REDACTION_THRESHOLD {
            INTERNAL_ERROR.to_string()
        } else if log.message() == INTERNAL_ERROR {
            format!("\"{}\"", INTERNAL_ERROR)
        } else {
            log.message().to_string()
        };

        Self {
            id: log.id(),
            status,
            message,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the exposed message contains any of `needles`
    pub fn is<S: AsRef<str>>(&self, needles: &[S]) -> bool {
        needles.iter().any(|n| self.message.contains(n.as_ref()))
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id: {})", self.message, self.id)
    }
}

impl std::error::Error for StatusError {}
