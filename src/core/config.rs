//! Logger configuration
//!
//! Configuration is plain data: built once, normalized, then shared read-only.
//! Zero values mean "use the default", so partially filled configs (for
//! example from a JSON file) behave the same as the builder defaults.

use super::error::Result;
use super::output_format::OutputFormat;
use super::status_map::StatusMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LEVEL: u16 = 400;
pub const DEFAULT_RETRIES: usize = 5;
pub const DEFAULT_WAIT: Duration = Duration::from_secs(1);

/// Where rendered records go
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Output {
    #[default]
    Stdout,
    /// Records are rendered nowhere and no I/O happens
    Suppressed,
    File(PathBuf),
}

impl From<&str> for Output {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" | "stdout" => Output::Stdout,
            "none" | "null" | "discard" | "suppressed" => Output::Suppressed,
            path => Output::File(PathBuf::from(path)),
        }
    }
}

impl From<String> for Output {
    fn from(value: String) -> Self {
        Output::from(value.as_str())
    }
}

impl From<Output> for String {
    fn from(output: Output) -> Self {
        output.to_string()
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => f.write_str("stdout"),
            Output::Suppressed => f.write_str("none"),
            Output::File(path) => write!(f, "{}", path.display()),
        }
    }
}

mod wait_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Rendering applied before a record reaches the sink
    pub format: OutputFormat,
    /// Inclusive status threshold for rendering and writing
    pub level: u16,
    pub output: Output,
    /// Failed attempts allowed by bounded retry
    pub retries: usize,
    /// Sleep between attempts, for every retry policy
    #[serde(rename = "wait_ms", with = "wait_millis")]
    pub wait: Duration,
    pub status_map: StatusMap,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            level: DEFAULT_LEVEL,
            output: Output::default(),
            retries: DEFAULT_RETRIES,
            wait: DEFAULT_WAIT,
            status_map: StatusMap::default(),
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing or zero fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Replace zero-valued fields with their defaults
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.level == 0 {
            self.level = DEFAULT_LEVEL;
        }
        if self.retries == 0 {
            self.retries = DEFAULT_RETRIES;
        }
        if self.wait.is_zero() {
            self.wait = DEFAULT_WAIT;
        }
        self
    }
}
