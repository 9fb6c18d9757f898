//! # Delay policy between poll attempts.
//!
//! [`DelayPolicy`] decides how long the poller waits after a rejected attempt.
//! It is resolved once per [`Poller`](crate::Poller) from the optional settings
//! (interval, backoff flag, delay function), so the precedence rule lives in one place:
//!
//! ```text
//! delay_fn set           ──► Custom(f)        delay = f(attempt)
//! interval set, backoff  ──► Backoff(i)       delay = i × attempt
//! interval set           ──► Fixed(i)         delay = i
//! nothing set            ──► Immediate        delay = 0
//! ```
//!
//! The delay for attempt `n` is derived purely from `n` (1-based). Backoff is linear:
//! after attempt `n` the poller waits `interval × n`, which is exactly the running sum of
//! `interval` over the attempts made so far.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use pollvisor::DelayPolicy;
//!
//! let backoff = DelayPolicy::Backoff(Duration::from_millis(10));
//! assert_eq!(backoff.next(1), Duration::from_millis(10));
//! assert_eq!(backoff.next(2), Duration::from_millis(20));
//! assert_eq!(backoff.next(3), Duration::from_millis(30));
//!
//! let custom = DelayPolicy::custom(|attempt| Duration::from_millis(u64::from(attempt) * 7));
//! assert_eq!(custom.next(3), Duration::from_millis(21));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Caller-supplied mapping from a 1-based attempt number to the delay that follows it.
pub type DelayFn = Arc<dyn Fn(u32) -> Duration + Send + Sync + 'static>;

/// Spacing between consecutive attempts.
#[derive(Clone, Default)]
pub enum DelayPolicy {
    /// No wait; the next attempt starts as soon as the previous one is rejected.
    #[default]
    Immediate,
    /// Constant delay after every attempt.
    Fixed(Duration),
    /// Linear backoff: `interval × attempt`.
    Backoff(Duration),
    /// Delay computed by a caller function from the attempt number.
    Custom(DelayFn),
}

impl DelayPolicy {
    /// Wraps a closure as [`DelayPolicy::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        DelayPolicy::Custom(Arc::new(f))
    }

    /// Resolves the optional poller settings into a single policy.
    ///
    /// A delay function always wins; `backoff` only has an effect when an interval is set.
    pub fn resolve(interval: Option<Duration>, backoff: bool, delay_fn: Option<DelayFn>) -> Self {
        match (delay_fn, interval) {
            (Some(f), _) => DelayPolicy::Custom(f),
            (None, Some(i)) if backoff => DelayPolicy::Backoff(i),
            (None, Some(i)) => DelayPolicy::Fixed(i),
            (None, None) => DelayPolicy::Immediate,
        }
    }

    /// Computes the delay that follows attempt number `attempt` (1-based).
    ///
    /// For [`DelayPolicy::Custom`] this calls the function exactly once.
    /// [`DelayPolicy::Backoff`] saturates at [`Duration::MAX`] instead of overflowing.
    pub fn next(&self, attempt: u32) -> Duration {
        match self {
            DelayPolicy::Immediate => Duration::ZERO,
            DelayPolicy::Fixed(interval) => *interval,
            DelayPolicy::Backoff(interval) => interval.saturating_mul(attempt),
            DelayPolicy::Custom(f) => f(attempt),
        }
    }
}

impl fmt::Debug for DelayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayPolicy::Immediate => f.write_str("Immediate"),
            DelayPolicy::Fixed(i) => f.debug_tuple("Fixed").field(i).finish(),
            DelayPolicy::Backoff(i) => f.debug_tuple("Backoff").field(i).finish(),
            DelayPolicy::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}
