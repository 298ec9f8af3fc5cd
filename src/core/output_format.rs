//! Output format configuration for log records
//!
//! Provides the renderings a record can take before reaching a sink:
//! - Json: every field, stable key names (default)
//! - Text: space-joined line
//! - Csv: one RFC 4180 row, terminator stripped

use super::log_entry::{format_timestamp, Log};
use super::row_schema::RowSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Output format for log records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    /// Structured format
    ///
    /// Example: `{"timestamp":"2025-01-08T10:30:45.123456789Z","severity":"INFO","id":"…","path":"src/main.rs","line":12,"status":200,"message":"ready"}`
    #[default]
    Json,

    /// Line format
    ///
    /// Example: `2025-01-08T10:30:45.123456789Z INFO 6f1c… src/main.rs 12 ready`
    Text,

    /// Delimited-row format
    ///
    /// Example: `2025-01-08T10:30:45.123456789Z,INFO,6f1c…,src/main.rs,12,ready`
    Csv,

    /// Unrecognized format name; renders as an empty string
    Unknown(String),
}

fn log_row_schema() -> &'static RowSchema<Log> {
    static SCHEMA: OnceLock<RowSchema<Log>> = OnceLock::new();
    SCHEMA.get_or_init(RowSchema::log_fields)
}

impl OutputFormat {
    /// Render a record according to this format
    pub fn render(&self, log: &Log) -> String {
        match self {
            OutputFormat::Json => self.render_json(log),
            OutputFormat::Text => self.render_text(log),
            OutputFormat::Csv => log_row_schema().encode(log).unwrap_or_default(),
            OutputFormat::Unknown(_) => String::new(),
        }
    }

    fn render_json(&self, log: &Log) -> String {
        serde_json::to_string(log).unwrap_or_default()
    }

    /// Line rendering escapes control characters so one record stays one line
    fn render_text(&self, log: &Log) -> String {
        [
            format_timestamp(log.timestamp()),
            log.severity().to_string(),
            log.id().to_string(),
            log.path().to_string(),
            log.line().to_string(),
            sanitize_message(log.message()),
        ]
        .join(" ")
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
            OutputFormat::Csv => "csv",
            OutputFormat::Unknown(name) => name,
        }
    }
}

/// Replace newlines, carriage returns and tabs with escape sequences
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

impl From<&str> for OutputFormat {
    fn from(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "" | "json" | "structured" => OutputFormat::Json,
            "text" => OutputFormat::Text,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Unknown(name.to_string()),
        }
    }
}

impl From<String> for OutputFormat {
    fn from(name: String) -> Self {
        OutputFormat::from(name.as_str())
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
