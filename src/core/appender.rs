//! Appender trait for log output destinations

use super::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Destination for rendered records.
///
/// Appenders receive text that is already rendered and filtered by level;
/// each call carries one record and the appender owns line termination.
pub trait Appender: Send + Sync {
    fn append(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Appender handle that several loggers may write through
pub type SharedAppender = Arc<Mutex<Box<dyn Appender>>>;

/// Wrap an appender so it can be handed to more than one logger
pub fn shared<A: Appender + 'static>(appender: A) -> SharedAppender {
    Arc::new(Mutex::new(Box::new(appender)))
}
