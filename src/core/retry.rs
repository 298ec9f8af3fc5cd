//! Retry and loop control around fallible operations
//!
//! Every policy runs through [`Logger::retry_with`]: one blocking loop that
//! calls the operation, matches failures against stop substrings, and sleeps
//! `config.wait` between attempts. The policies only differ in whether a
//! budget applies, whether success ends the loop, and whether a matched
//! failure is a stop condition or a signature to wait out.

use super::log_entry::CallSite;
use super::logger::Logger;
use super::status_error::{contains_any, StatusError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Stop policy for [`Logger::retry_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryMode {
    /// Give up after `config.retries` failed attempts
    Bounded,
    /// Retry until success or a matched failure
    Unbounded,
    /// Keep calling even after success; only a matched failure stops it
    Loop,
    /// Wait out one failure signature, logging it once
    Dedup,
}

impl RetryMode {
    pub fn has_budget(self) -> bool {
        matches!(self, RetryMode::Bounded)
    }

    pub fn stops_on_success(self) -> bool {
        !matches!(self, RetryMode::Loop)
    }

    pub fn dedups(self) -> bool {
        matches!(self, RetryMode::Dedup)
    }
}

/// How a retry run ended. `attempts` counts calls to the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<E> {
    Succeeded { attempts: usize },
    /// The failure contained a stop substring
    StoppedByMatch { error: E, attempts: usize },
    /// The failure budget ran out
    Exhausted { error: E, attempts: usize },
    /// A deduplicated run saw an error without the signature
    Released { error: E, attempts: usize },
    /// The stop signal was raised before the next attempt
    Cancelled { last_error: Option<E>, attempts: usize },
}

impl<E> RetryOutcome<E> {
    pub fn attempts(&self) -> usize {
        match self {
            RetryOutcome::Succeeded { attempts }
            | RetryOutcome::StoppedByMatch { attempts, .. }
            | RetryOutcome::Exhausted { attempts, .. }
            | RetryOutcome::Released { attempts, .. }
            | RetryOutcome::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Succeeded { .. })
    }

    /// Collapse into what the operation last returned.
    ///
    /// A cancelled run with no failure on record is `Ok`.
    pub fn into_result(self) -> Result<(), E> {
        match self {
            RetryOutcome::Succeeded { .. } | RetryOutcome::Cancelled { last_error: None, .. } => Ok(()),
            RetryOutcome::StoppedByMatch { error, .. }
            | RetryOutcome::Exhausted { error, .. }
            | RetryOutcome::Released { error, .. }
            | RetryOutcome::Cancelled {
                last_error: Some(error),
                ..
            } => Err(error),
        }
    }
}

/// Cooperative cancellation for a running retry loop.
///
/// Clones share one flag; raising it from any thread ends the loop before
/// its next attempt.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Logger {
    /// Run `op` under `mode` until the policy says to stop.
    ///
    /// Blocks the calling thread for the whole run, including the sleeps
    /// between attempts. Records emitted by `Loop` and `Dedup` runs are
    /// attributed to the caller of this method.
    #[track_caller]
    pub fn retry_with<E, F>(
        &self,
        mode: RetryMode,
        needles: &[&str],
        signal: Option<&StopSignal>,
        mut op: F,
    ) -> RetryOutcome<E>
    where
        E: fmt::Display,
        F: FnMut() -> Result<(), E>,
    {
        let site = CallSite::caller();
        let budget = self.config().retries;
        let wait = self.config().wait;

        let mut attempts = 0;
        let mut failures = 0;
        let mut last_error = None;

        loop {
            if signal.is_some_and(StopSignal::is_stopped) {
                return RetryOutcome::Cancelled { last_error, attempts };
            }

            attempts += 1;
            match op() {
                Ok(()) if mode.stops_on_success() => return RetryOutcome::Succeeded { attempts },
                Ok(()) => last_error = None,
                Err(error) => {
                    failures += 1;
                    let matched = contains_any(&error, needles);

                    if mode.dedups() {
                        if !matched {
                            return RetryOutcome::Released { error, attempts };
                        }
                        // every failure so far carried the signature
                        if failures == 1 {
                            self.error_mapped_at(site.clone(), error.to_string());
                        }
                    } else if matched {
                        if mode == RetryMode::Loop {
                            self.error_mapped_at(site, format!("infinite loop stopped: {}", error));
                        }
                        return RetryOutcome::StoppedByMatch { error, attempts };
                    } else if mode.has_budget() && failures >= budget {
                        return RetryOutcome::Exhausted { error, attempts };
                    }

                    last_error = Some(error);
                }
            }

            thread::sleep(wait);
        }
    }

    /// Bounded retry: at most `config.retries` failed calls.
    ///
    /// A failure containing any of `stop` is returned at once, whatever
    /// budget is left.
    ///
    /// # Example
    /// ```
    /// use rust_status_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder()
    ///     .output("none")
    ///     .retries(3)
    ///     .wait(Duration::from_millis(1))
    ///     .build()
    ///     .unwrap();
    ///
    /// let mut calls = 0;
    /// let result = logger.retry(&["nope"], || {
    ///     calls += 1;
    ///     Err::<(), _>(format!("timeout #{}", calls))
    /// });
    ///
    /// assert_eq!(calls, 3);
    /// assert_eq!(result.unwrap_err(), "timeout #3");
    /// ```
    #[track_caller]
    pub fn retry<E, F>(&self, stop: &[&str], op: F) -> Result<(), E>
    where
        E: fmt::Display,
        F: FnMut() -> Result<(), E>,
    {
        self.retry_with(RetryMode::Bounded, stop, None, op).into_result()
    }

    /// Retry until success or a failure containing any of `stop`
    #[track_caller]
    pub fn infinite_retry<E, F>(&self, stop: &[&str], op: F) -> Result<(), E>
    where
        E: fmt::Display,
        F: FnMut() -> Result<(), E>,
    {
        self.retry_with(RetryMode::Unbounded, stop, None, op).into_result()
    }

    /// Call `op` forever, success or not, until it fails with one of `stop`.
    ///
    /// The stopping failure is logged and not returned.
    #[track_caller]
    pub fn infinite_loop<E, F>(&self, stop: &[&str], op: F)
    where
        E: fmt::Display,
        F: FnMut() -> Result<(), E>,
    {
        self.retry_with(RetryMode::Loop, stop, None, op);
    }

    /// Retry while the failure contains `signature`, logging it only once.
    ///
    /// Returns whatever `op` returns first without the signature. The
    /// recovery itself is not logged.
    #[track_caller]
    pub fn retry_while_matching<E, F>(&self, signature: &str, op: F) -> Result<(), E>
    where
        E: fmt::Display,
        F: FnMut() -> Result<(), E>,
    {
        self.retry_with(RetryMode::Dedup, &[signature], None, op).into_result()
    }

    /// Bounded retry that stops on any substring in the status map and
    /// reports the final failure as a [`StatusError`].
    #[track_caller]
    pub fn run_with_retries<E, F>(&self, op: F) -> Result<(), StatusError>
    where
        E: fmt::Display,
        F: FnMut() -> Result<(), E>,
    {
        let site = CallSite::caller();
        let needles = self.config().status_map.needles();
        let needles: Vec<&str> = needles.iter().map(String::as_str).collect();

        self.retry_with(RetryMode::Bounded, &needles, None, op)
            .into_result()
            .map_err(|error| self.error_mapped_at(site, error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::DiscardAppender;
    use std::time::Duration;

    fn quick_logger(retries: usize) -> Logger {
        Logger::builder()
            .retries(retries)
            .wait(Duration::from_millis(1))
            .appender(DiscardAppender::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_mode_flags() {
        assert!(RetryMode::Bounded.has_budget());
        assert!(!RetryMode::Unbounded.has_budget());
        assert!(!RetryMode::Loop.stops_on_success());
        assert!(RetryMode::Dedup.stops_on_success());
        assert!(RetryMode::Dedup.dedups());
        assert!(!RetryMode::Bounded.dedups());
    }

    #[test]
    fn test_success_on_first_attempt() {
        let logger = quick_logger(3);
        let outcome = logger.retry_with(RetryMode::Bounded, &[], None, || Ok::<(), String>(()));
        assert_eq!(outcome, RetryOutcome::Succeeded { attempts: 1 });
    }

    #[test]
    fn test_bounded_counts_failures() {
        let logger = quick_logger(4);
        let mut calls = 0;
        let outcome = logger.retry_with(RetryMode::Bounded, &["fatal"], None, || {
            calls += 1;
            Err(format!("attempt {}", calls))
        });

        assert_eq!(
            outcome,
            RetryOutcome::Exhausted {
                error: "attempt 4".to_string(),
                attempts: 4
            }
        );
    }

    #[test]
    fn test_match_wins_over_exhausted_budget() {
        let logger = quick_logger(2);
        let mut calls = 0;
        let outcome = logger.retry_with(RetryMode::Bounded, &["gone"], None, || {
            calls += 1;
            if calls == 2 {
                Err("resource gone".to_string())
            } else {
                Err("busy".to_string())
            }
        });

        assert!(matches!(outcome, RetryOutcome::StoppedByMatch { attempts: 2, .. }));
    }

    #[test]
    fn test_unbounded_ignores_budget() {
        let logger = quick_logger(1);
        let mut calls = 0;
        let result = logger.infinite_retry(&["nope"], || {
            calls += 1;
            if calls < 6 {
                Err("busy")
            } else {
                Ok(())
            }
        });

        assert!(result.is_ok());
        assert_eq!(calls, 6);
    }

    #[test]
    fn test_loop_continues_after_success() {
        let logger = quick_logger(1);
        let mut calls = 0;
        let outcome = logger.retry_with(RetryMode::Loop, &["shutdown"], None, || {
            calls += 1;
            match calls {
                1 | 2 => Ok(()),
                3 => Err("transient".to_string()),
                _ => Err("shutdown requested".to_string()),
            }
        });

        assert!(matches!(outcome, RetryOutcome::StoppedByMatch { attempts: 4, .. }));
    }

    #[test]
    fn test_dedup_released_by_other_error() {
        let logger = quick_logger(1);
        let mut calls = 0;
        let outcome = logger.retry_with(RetryMode::Dedup, &["locked"], None, || {
            calls += 1;
            if calls < 3 {
                Err("table locked".to_string())
            } else {
                Err("constraint violated".to_string())
            }
        });

        assert_eq!(
            outcome,
            RetryOutcome::Released {
                error: "constraint violated".to_string(),
                attempts: 3
            }
        );
    }

    #[test]
    fn test_stop_signal_cancels_before_next_attempt() {
        let logger = quick_logger(1);
        let signal = StopSignal::new();
        let mut calls = 0;

        let outcome = logger.retry_with(RetryMode::Unbounded, &[], Some(&signal), || {
            calls += 1;
            if calls == 3 {
                signal.stop();
            }
            Err("busy".to_string())
        });

        assert_eq!(
            outcome,
            RetryOutcome::Cancelled {
                last_error: Some("busy".to_string()),
                attempts: 3
            }
        );
    }

    #[test]
    fn test_raised_signal_skips_all_attempts() {
        let logger = quick_logger(1);
        let signal = StopSignal::new();
        signal.stop();

        let outcome = logger.retry_with(RetryMode::Loop, &[], Some(&signal), || Ok::<(), String>(()));
        assert_eq!(outcome.attempts(), 0);
        assert!(outcome.into_result().is_ok());
    }

    #[test]
    fn test_run_with_retries_projects_final_error() {
        let logger = Logger::builder()
            .retries(2)
            .wait(Duration::from_millis(1))
            .status(409, ["already exists"])
            .appender(DiscardAppender::new())
            .build()
            .unwrap();

        let err = logger
            .run_with_retries(|| Err::<(), _>("row already exists"))
            .unwrap_err();
        assert_eq!(err.status(), 409);
        assert_eq!(err.message(), "row already exists");

        let mut calls = 0;
        let err = logger
            .run_with_retries(|| {
                calls += 1;
                Err::<(), _>("socket closed")
            })
            .unwrap_err();
        assert_eq!(calls, 2);
        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), "internal error");
    }
}
