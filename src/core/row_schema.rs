//! Explicit column schemas for delimited-row output
//!
//! A schema is an ordered list of named accessors. The names form the header
//! row and each accessor produces one cell, so encoding a record never needs
//! to inspect its type at runtime.

use super::error::{LoggerError, Result};
use super::log_entry::{format_timestamp, Log};
use std::collections::HashMap;

type Accessor<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

pub struct RowSchema<T> {
    columns: Vec<(String, Accessor<T>)>,
}

impl<T> RowSchema<T> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Append a named column
    #[must_use = "builder methods return a new value"]
    pub fn field<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.columns.push((name.into(), Box::new(accessor)));
        self
    }

    /// Header row
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Cells for `record`, in column order
    pub fn values(&self, record: &T) -> Vec<String> {
        self.columns.iter().map(|(_, get)| get(record)).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Encode `record` as a single RFC 4180 row without the record terminator
    pub fn encode(&self, record: &T) -> Result<String> {
        encode_row(&self.values(record))
    }
}

impl<T> Default for RowSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSchema<Log> {
    /// timestamp, severity, id, path, line, message
    pub fn log_fields() -> Self {
        RowSchema::new()
            .field("timestamp", |log: &Log| format_timestamp(log.timestamp()))
            .field("severity", |log: &Log| log.severity().to_string())
            .field("id", |log: &Log| log.id().to_string())
            .field("path", |log: &Log| log.path().to_string())
            .field("line", |log: &Log| log.line().to_string())
            .field("message", |log: &Log| log.message().to_string())
    }
}

impl RowSchema<HashMap<String, String>> {
    /// Schema over string maps; absent keys encode as empty cells
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(RowSchema::new(), |schema, name| {
            let name: String = name.into();
            let key = name.clone();
            schema.field(name, move |values: &HashMap<String, String>| {
                values.get(&key).cloned().unwrap_or_default()
            })
        })
    }
}

/// Encode one row with minimal RFC 4180 quoting, terminator stripped
pub(crate) fn encode_row<S: AsRef<[u8]>>(fields: &[S]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| LoggerError::formatter("csv", e.to_string()))?;
    let row = String::from_utf8(bytes)
        .map_err(|e| LoggerError::formatter("csv", e.to_string()))?;

    Ok(row.strip_suffix('\n').map(str::to_string).unwrap_or(row))
}
