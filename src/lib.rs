//! # Rust Status Logger
//!
//! Status-code driven structured logging with correlated errors and retry
//! orchestration.
//!
//! ## Features
//!
//! - **Status Classification**: HTTP-style status codes map to severities
//! - **Correlated Errors**: every record carries a UUID shared with the error
//!   derived from it, and server-side messages are redacted at the boundary
//! - **Multiple Formats**: JSON, single-line text and CSV rendering
//! - **Rotating Files**: size and age based rotation with optional gzip
//! - **Retry Policies**: bounded, unbounded, loop and deduplicated retry from
//!   one primitive
//!
//! ## Example
//!
//! ```
//! use rust_status_logger::prelude::*;
//! use std::time::Duration;
//!
//! let logger = Logger::builder()
//!     .format("text")
//!     .output("none")
//!     .wait(Duration::from_millis(1))
//!     .build()
//!     .unwrap();
//!
//! let err = logger.error_f(502, "upstream timed out");
//! assert_eq!(err.to_string(), format!("internal error (id: {})", err.id()));
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, CsvFileLogger, FileAppender, RotatingFileAppender};
    pub use crate::core::{
        Appender, CallSite, Log, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        Output, OutputFormat, Result, RetryMode, RetryOutcome, RowSchema, Severity, StatusError,
        StatusMap, StopSignal,
    };
}

pub use appenders::{ConsoleAppender, CsvFileLogger, DiscardAppender, FileAppender, RotatingFileAppender, RotationPolicy};
pub use core::{
    contains_any, shared, Appender, CallSite, Log, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, Output, OutputFormat, Result, RetryMode, RetryOutcome, RowSchema, Severity,
    SharedAppender, StatusError, StatusMap, StopSignal,
};
