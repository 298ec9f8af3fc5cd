//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod log_entry;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod retry;
pub mod row_schema;
pub mod severity;
pub mod status_error;
pub mod status_map;

pub use appender::{shared, Appender, SharedAppender};
pub use config::{LoggerConfig, Output, DEFAULT_LEVEL, DEFAULT_RETRIES, DEFAULT_WAIT};
pub use error::{LoggerError, Result};
pub use log_entry::{CallSite, Log};
pub use logger::{Logger, LoggerBuilder, FATAL_STATUS, INFO_STATUS};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use retry::{RetryMode, RetryOutcome, StopSignal};
pub use row_schema::RowSchema;
pub use severity::Severity;
pub use status_error::{contains_any, StatusError, INTERNAL_ERROR};
pub use status_map::StatusMap;
