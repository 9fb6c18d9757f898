//! Error types returned by the poller.
//!
//! This module defines two enums:
//!
//! - [`PollError`] — terminal outcome of a poll invocation that did not accept a value.
//! - [`ConfigError`] — rejected configuration when building a [`Poller`](crate::Poller).
//!
//! [`PollError`] provides helper methods (`as_label`, `as_message`) for logging/metrics
//! and accessors to recover the producer's own error.

use thiserror::Error;

/// # Errors produced by a poll invocation.
///
/// `E` is the producer's error type. A producer failure is carried verbatim in
/// [`PollError::Producer`]; every other variant is raised by the poller itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PollError<E> {
    /// The producer failed; no further attempts were made.
    #[error(transparent)]
    Producer(E),

    /// The attempt ceiling was reached without an accepted value.
    #[error("exceeded max attempts ({max_attempts})")]
    AttemptsExceeded {
        /// The configured ceiling (equal to the number of producer calls made).
        max_attempts: u32,
    },

    /// The cancellation token given to the poller fired.
    #[error("poll cancelled after {attempts} attempts")]
    Canceled {
        /// Completed attempts before cancellation was observed.
        attempts: u32,
    },
}

impl<E> PollError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pollvisor::PollError;
    ///
    /// let err: PollError<std::io::Error> = PollError::AttemptsExceeded { max_attempts: 5 };
    /// assert_eq!(err.as_label(), "poll_attempts_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PollError::Producer(_) => "poll_producer_failed",
            PollError::AttemptsExceeded { .. } => "poll_attempts_exceeded",
            PollError::Canceled { .. } => "poll_canceled",
        }
    }

    /// Returns `true` if the producer itself failed.
    pub fn is_producer(&self) -> bool {
        matches!(self, PollError::Producer(_))
    }

    /// Returns `true` if the attempt ceiling was reached.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, PollError::AttemptsExceeded { .. })
    }

    /// Consumes the error, returning the producer's error if that is what failed.
    ///
    /// # Example
    /// ```
    /// use pollvisor::PollError;
    ///
    /// let err: PollError<&str> = PollError::Producer("connection refused");
    /// assert_eq!(err.into_producer(), Some("connection refused"));
    /// ```
    pub fn into_producer(self) -> Option<E> {
        match self {
            PollError::Producer(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: std::fmt::Display> PollError<E> {
    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PollError::Producer(e) => format!("producer: {e}"),
            PollError::AttemptsExceeded { max_attempts } => {
                format!("no accepted value after {max_attempts} attempts")
            }
            PollError::Canceled { attempts } => format!("cancelled after {attempts} attempts"),
        }
    }
}

/// Error returned when a [`Poller`](crate::Poller) is built from an invalid [`PollConfig`](crate::PollConfig).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_attempts` was zero; at least one attempt is required.
    #[error("max_attempts must be at least 1")]
    ZeroMaxAttempts,
}
