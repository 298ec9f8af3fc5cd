//! Logging macros with `format!`-style message formatting.
//!
//! The format string and its arguments are checked at compile time, and the
//! record is attributed to the line the macro is invoked on.
//!
//! # Examples
//!
//! ```
//! use rust_status_logger::prelude::*;
//! use rust_status_logger::{error_f, info};
//!
//! let logger = Logger::builder().output("none").build().unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let err = error_f!(logger, 404, "user {} not found", 42);
//! assert_eq!(err.message(), "user 42 not found");
//! ```

/// Build a record with an explicit status.
///
/// # Examples
///
/// ```
/// # use rust_status_logger::prelude::*;
/// # let logger = Logger::builder().output("none").build().unwrap();
/// use rust_status_logger::log_f;
/// let log = log_f!(logger, 302, "redirect to {}", "/login");
/// assert_eq!(log.severity(), Severity::Notice);
/// ```
#[macro_export]
macro_rules! log_f {
    ($logger:expr, $status:expr, $($arg:tt)+) => {
        $logger.log_f($status, format!($($arg)+))
    };
}

/// Build a record at status 200.
///
/// # Examples
///
/// ```
/// # use rust_status_logger::prelude::*;
/// # let logger = Logger::builder().output("none").build().unwrap();
/// use rust_status_logger::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format!($($arg)+))
    };
}

/// Log with an explicit status and return the derived [`StatusError`](crate::StatusError).
///
/// # Examples
///
/// ```
/// # use rust_status_logger::prelude::*;
/// # let logger = Logger::builder().output("none").build().unwrap();
/// use rust_status_logger::error_f;
/// let err = error_f!(logger, 503, "upstream {} unavailable", "billing");
/// assert_eq!(err.message(), "internal error");
/// ```
#[macro_export]
macro_rules! error_f {
    ($logger:expr, $status:expr, $($arg:tt)+) => {
        $logger.error_f($status, format!($($arg)+))
    };
}

/// Log with the status the logger's status map assigns to the message.
///
/// # Examples
///
/// ```
/// # use rust_status_logger::prelude::*;
/// # let logger = Logger::builder().output("none").status(404, ["not found"]).build().unwrap();
/// use rust_status_logger::error_mapped;
/// let err = error_mapped!(logger, "order {} not found", 17);
/// assert_eq!(err.status(), 404);
/// ```
#[macro_export]
macro_rules! error_mapped {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error_mapped(format!($($arg)+))
    };
}

/// Log at status 501 and exit the process with code 1.
///
/// # Examples
///
/// ```no_run
/// # use rust_status_logger::prelude::*;
/// # let logger = Logger::default();
/// use rust_status_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+))
    };
}
