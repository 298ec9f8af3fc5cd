//! Standard-stream and discarding appenders

use crate::core::{Appender, Result};
use std::io::Write;

/// Writes each record to stdout and flushes before returning
pub struct ConsoleAppender;

impl ConsoleAppender {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", line)?;
        handle.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Accepts every record and performs no I/O
#[derive(Debug, Default)]
pub struct DiscardAppender;

impl DiscardAppender {
    pub fn new() -> Self {
        Self
    }
}

impl Appender for DiscardAppender {
    fn append(&mut self, _line: &str) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}
