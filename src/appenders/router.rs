//! Sink selection from the configured output

use super::{ConsoleAppender, DiscardAppender, FileAppender, RotatingFileAppender};
use crate::core::{Appender, Output, Result};
use std::path::Path;

/// File extensions that get a rotating sink: line, text, structured and row logs
pub const ROTATED_EXTENSIONS: [&str; 4] = ["log", "txt", "json", "csv"];

/// Whether a file output at `path` is rotated
pub fn is_rotated(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ROTATED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Build the appender for `output`.
///
/// File paths outside the extension allow-list still get a working writer,
/// just without rotation.
pub fn open(output: &Output) -> Result<Box<dyn Appender>> {
    Ok(match output {
        Output::Stdout => Box::new(ConsoleAppender::new()),
        Output::Suppressed => Box::new(DiscardAppender::new()),
        Output::File(path) if is_rotated(path) => Box::new(RotatingFileAppender::new(path)?),
        Output::File(path) => Box::new(FileAppender::new(path)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extension_allow_list() {
        assert!(is_rotated(Path::new("app.log")));
        assert!(is_rotated(Path::new("/var/log/app.JSON")));
        assert!(is_rotated(Path::new("rows.csv")));
        assert!(is_rotated(Path::new("notes.txt")));
        assert!(!is_rotated(Path::new("app.out")));
        assert!(!is_rotated(Path::new("app")));
    }

    #[test]
    fn test_routing() {
        let dir = tempdir().unwrap();

        assert_eq!(open(&Output::Stdout).unwrap().name(), "console");
        assert_eq!(open(&Output::Suppressed).unwrap().name(), "discard");

        let rotated = open(&Output::File(dir.path().join("a.log"))).unwrap();
        assert_eq!(rotated.name(), "rotating_file");

        let plain = open(&Output::File(dir.path().join("a.data"))).unwrap();
        assert_eq!(plain.name(), "file");
    }
}
