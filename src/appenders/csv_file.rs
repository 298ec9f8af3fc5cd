//! Create-only delimited-row file logger
//!
//! The target file must not exist yet: the header row is written once at
//! creation, and appending rows to a file with a different header would
//! silently corrupt it.

use crate::core::{LoggerError, Result, RowSchema};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Writes records of type `T` as rows of a new CSV file
///
/// # Examples
///
/// ```no_run
/// use rust_status_logger::appenders::CsvFileLogger;
/// use rust_status_logger::RowSchema;
/// use std::collections::HashMap;
///
/// let schema = RowSchema::columns(["user", "action"]);
/// let mut rows = CsvFileLogger::create("audit/actions.csv", schema).unwrap();
///
/// let mut values = HashMap::new();
/// values.insert("user".to_string(), "alice".to_string());
/// rows.write(&values).unwrap();
/// ```
pub struct CsvFileLogger<T> {
    path: PathBuf,
    schema: RowSchema<T>,
    writer: Option<csv::Writer<File>>,
}

impl<T> CsvFileLogger<T> {
    /// Create the file and write the header row
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::FileAlreadyExists`] without touching the file
    /// when `path` is already present, or an IO error if it cannot be created
    pub fn create<P: AsRef<Path>>(path: P, schema: RowSchema<T>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let display = path.display().to_string();

        if schema.is_empty() {
            return Err(LoggerError::config("CsvFileLogger", "schema has no columns"));
        }
        if path.exists() {
            return Err(LoggerError::file_exists(display));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        // create_new closes the gap between the existence check and the open
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => LoggerError::file_exists(display.clone()),
                _ => LoggerError::file_appender(display.clone(), format!("Failed to open: {}", e)),
            })?;

        file.try_lock_exclusive()
            .map_err(|_| LoggerError::file_lock(display.clone()))?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);
        writer.write_record(schema.names())?;
        writer.flush()?;

        Ok(Self {
            path,
            schema,
            writer: Some(writer),
        })
    }

    /// Write one row and flush it
    pub fn write(&mut self, record: &T) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("CSV file already closed"))?;

        writer.write_record(self.schema.values(record))?;
        writer.flush()?;
        Ok(())
    }

    /// Flush and release the file
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            let file = writer
                .into_inner()
                .map_err(|e| LoggerError::writer(e.to_string()))?;
            let _ = FileExt::unlock(&file);
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> Vec<&str> {
        self.schema.names()
    }
}

impl<T> Drop for CsvFileLogger<T> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_entry::{CallSite, Log};
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_writes_header_then_rows() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out").join("file.csv");

        let mut rows = CsvFileLogger::create(&path, RowSchema::columns(["header1", "header2", "header3"]))?;
        let mut values = HashMap::new();
        values.insert("header1".to_string(), "value1".to_string());
        values.insert("header2".to_string(), "value, two".to_string());
        values.insert("header3".to_string(), "value3".to_string());
        rows.write(&values)?;
        rows.close()?;

        let content = fs::read_to_string(&path)?;
        assert_eq!(content, "header1,header2,header3\nvalue1,\"value, two\",value3\n");
        Ok(())
    }

    #[test]
    fn test_existing_file_is_refused() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("taken.csv");
        fs::write(&path, "a,b\n1,2\n")?;

        let result = CsvFileLogger::create(&path, RowSchema::columns(["x"]));
        assert!(matches!(result, Err(LoggerError::FileAlreadyExists { .. })));
        assert_eq!(fs::read_to_string(&path)?, "a,b\n1,2\n");
        Ok(())
    }

    #[test]
    fn test_log_schema_rows() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("logs.csv");

        let mut rows = CsvFileLogger::create(&path, RowSchema::log_fields())?;
        let log = Log::new(200, "ok", CallSite::new("main.rs", 3));
        rows.write(&log)?;
        drop(rows);

        let content = fs::read_to_string(&path)?;
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("timestamp,severity,id,path,line,message"));
        let row = lines.next().unwrap();
        assert!(row.contains(",INFO,"));
        assert!(row.ends_with(",main.rs,3,ok"));
        assert!(row.contains(&log.id().to_string()));
        Ok(())
    }

    #[test]
    fn test_empty_schema_is_rejected() {
        let dir = tempdir().unwrap();
        let result = CsvFileLogger::<Log>::create(dir.path().join("empty.csv"), RowSchema::new());
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }
}
