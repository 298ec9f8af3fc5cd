//! Rotating file appender with automatic log rotation
//!
//! Rotation is size driven. When the active file reaches the size limit it is
//! moved to `<name>.1`, older backups shift up by one, the backup count is
//! capped, and backups older than the age limit are pruned.

use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const MEGABYTE: u64 = 1024 * 1024;
const DAY: Duration = Duration::from_secs(24 * 3600);

/// Configuration for rotating file appender
///
/// # Examples
///
/// ```
/// use rust_status_logger::appenders::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(7 * 24 * 3600))
///     .with_compression(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPolicy {
    /// Size in bytes at which the active file is rotated
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep
    pub max_backup_files: usize,
    /// Rotated files older than this are removed; `None` keeps them
    pub max_age: Option<Duration>,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    /// 5 MB files, 100 backups, 30 days
    fn default() -> Self {
        Self {
            max_bytes: 5 * MEGABYTE,
            max_backup_files: 100,
            max_age: Some(30 * DAY),
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_bytes = size;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn without_max_age(mut self) -> Self {
        self.max_age = None;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Size-rotated file appender
///
/// # Examples
///
/// ```no_run
/// use rust_status_logger::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let appender = RotatingFileAppender::new("/var/log/app.log").unwrap();
///
/// let policy = RotationPolicy::new().with_max_backups(10).with_compression(true);
/// let appender = RotatingFileAppender::with_policy("/var/log/app.json", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileAppender {
    /// Create a rotating appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_active(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    fn open_active(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    fn should_rotate(&self) -> bool {
        self.current_size >= self.policy.max_bytes
    }

    fn rotate(&mut self) -> Result<()> {
        // Explicitly drop writer to release file handle before renaming
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let max = self.policy.max_backup_files;
        if max > 0 {
            remove_if_exists(&self.backup_path(max));
            remove_if_exists(&self.compressed_path(max));

            for i in (1..max).rev() {
                shift(&self.backup_path(i), &self.backup_path(i + 1))?;
                shift(&self.compressed_path(i), &self.compressed_path(i + 1))?;
            }

            let first = self.backup_path(1);
            if self.base_path.exists() {
                fs::rename(&self.base_path, &first).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;

                if self.policy.compress {
                    self.compress_file(&first, &self.compressed_path(1))?;
                }
            }
        } else {
            remove_if_exists(&self.base_path);
        }

        self.prune_expired();

        let (file, size) = Self::open_active(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;

        Ok(())
    }

    /// Remove backups whose modification time is past the age limit
    fn prune_expired(&self) {
        let Some(max_age) = self.policy.max_age else {
            return;
        };
        let now = SystemTime::now();

        for i in 1..=self.policy.max_backup_files {
            for path in [self.backup_path(i), self.compressed_path(i)] {
                let expired = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .map(|modified| now.duration_since(modified).unwrap_or(Duration::ZERO) > max_age)
                    .unwrap_or(false);
                if expired {
                    remove_if_exists(&path);
                }
            }
        }
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.sibling(format!("{}", index))
    }

    fn compressed_path(&self, index: usize) -> PathBuf {
        self.sibling(format!("{}.gz", index))
    }

    fn sibling(&self, suffix: String) -> PathBuf {
        let filename = self
            .base_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        self.base_path.with_file_name(format!("{}.{}", filename, suffix))
    }

    /// Gzip `source` into `target`, removing `source` only after success
    fn compress_file(&self, source: &Path, target: &Path) -> Result<()> {
        use std::io::BufReader;

        let temp = target.with_extension("gz.tmp");
        let result = (|| -> std::io::Result<()> {
            let mut reader = BufReader::new(File::open(source)?);
            let output = BufWriter::new(File::create(&temp)?);
            let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
            std::io::copy(&mut reader, &mut encoder)?;
            encoder.finish()?.flush()?;
            fs::rename(&temp, target)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&temp);
            return Err(LoggerError::io_operation(
                "compress log file",
                format!("Failed to compress '{}'", source.display()),
                e,
            ));
        }

        if let Err(e) = fs::remove_file(source) {
            eprintln!(
                "[WARN] Compression succeeded but failed to remove original file {}: {}",
                source.display(),
                e
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

fn remove_if_exists(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            eprintln!("[WARN] Failed to remove old backup {}: {}", path.display(), e);
        }
    }
}

fn shift(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Ok(());
    }
    fs::rename(from, to).map_err(|e| {
        LoggerError::file_rotation(
            from.display().to_string(),
            format!("Failed to rotate backup files: {}", e),
        )
    })
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, line: &str) -> Result<()> {
        if self.should_rotate() {
            if let Err(e) = self.rotate() {
                // Keep writing to whatever file we can open rather than lose records
                eprintln!("[WARN] Log rotation failed: {}. Continuing with current file.", e);

                if self.writer.is_none() {
                    let (file, size) = Self::open_active(&self.base_path).map_err(|reopen| {
                        eprintln!(
                            "[ERROR] Failed to reopen log file after rotation failure: {}",
                            reopen
                        );
                        e
                    })?;
                    self.writer = Some(BufWriter::new(file));
                    self.current_size = size;
                }

                // Allow the file to grow past the limit instead of retrying every write
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;

        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        writer
            .write_all(record.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to write log entry: {}", e),
                )
            })?;
        self.current_size += record.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
