//! Appender implementations

pub mod console;
pub mod csv_file;
pub mod file;
pub mod rotating_file;
pub mod router;

pub use console::{ConsoleAppender, DiscardAppender};
pub use csv_file::CsvFileLogger;
pub use file::FileAppender;
pub use rotating_file::{RotatingFileAppender, RotationPolicy};

pub use crate::core::Appender;
