//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Correlation ids stay unique across threads
//! - Loggers sharing one file sink never interleave partial lines
//! - Concurrent retry runs keep independent budgets
//! - Metrics stay exact under contention

use rust_status_logger::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

#[test]
fn test_ids_unique_across_threads() {
    let logger = Logger::builder()
        .output("none")
        .build()
        .expect("Failed to create logger");

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|i| logger.log_f(200, format!("thread {} record {}", t, i)).id())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().expect("worker panicked") {
            assert!(ids.insert(id), "duplicate id {}", id);
        }
    }
    assert_eq!(ids.len(), THREADS * PER_THREAD);
}

#[test]
fn test_shared_file_sink_keeps_lines_whole() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.log");

    let logger = Logger::builder()
        .level(100)
        .output(log_file.to_str().expect("utf-8 temp path"))
        .build()
        .expect("Failed to create logger");

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.log_f(200 + (i % 400) as u16, format!("thread {} message {}", t, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let mut ids = HashSet::new();
    for line in content.lines() {
        let log: Log = serde_json::from_str(line).expect("every line is one whole record");
        ids.insert(log.id());
    }
    assert_eq!(ids.len(), THREADS * PER_THREAD);
    assert_eq!(logger.metrics().written_count(), (THREADS * PER_THREAD) as u64);
}

#[test]
fn test_metrics_exact_under_contention() {
    let logger = Logger::builder()
        .level(400)
        .output("none")
        .build()
        .expect("Failed to create logger");

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let status = if i % 2 == 0 { 200 } else { 500 };
                    logger.log_f(status, "tick");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let half = (THREADS * PER_THREAD / 2) as u64;
    assert_eq!(logger.metrics().written_count(), half);
    assert_eq!(logger.metrics().filtered_count(), half);
    assert_eq!(logger.metrics().total_built(), half * 2);
}

#[test]
fn test_concurrent_retries_keep_own_budget() {
    let logger = Logger::builder()
        .output("none")
        .retries(4)
        .wait(Duration::from_millis(1))
        .build()
        .expect("Failed to create logger");
    let total_calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.clone();
            let total_calls = Arc::clone(&total_calls);
            thread::spawn(move || {
                let mut calls = 0;
                let result = logger.retry(&[], || {
                    calls += 1;
                    total_calls.fetch_add(1, Ordering::Relaxed);
                    Err(format!("worker {} attempt {}", t, calls))
                });
                (calls, result)
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        let (calls, result) = handle.join().expect("worker panicked");
        assert_eq!(calls, 4);
        assert_eq!(result, Err(format!("worker {} attempt 4", t)));
    }
    assert_eq!(total_calls.load(Ordering::Relaxed), THREADS * 4);
}
