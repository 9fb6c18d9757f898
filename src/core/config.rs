//! # Poller configuration.
//!
//! Provides [`PollConfig`] the plain-data settings a [`Poller`](crate::Poller) is built from.
//!
//! Config is used in two ways:
//! 1. **Direct**: `Poller::new(config)`
//! 2. **Builder seed**: `PollerBuilder::new(config)` then `with_*` overrides
//!
//! The delay function is not part of the config (it is not `Debug`/`Copy` data);
//! set it with [`PollerBuilder::with_delay_fn`](crate::PollerBuilder::with_delay_fn).

use std::time::Duration;

use crate::{error::ConfigError, policies::JitterPolicy};

/// Settings for a poller.
///
/// ## Field semantics
/// - `max_attempts`: Hard ceiling on producer calls per poll (must be `>= 1`)
/// - `interval`: Wait between attempts (`None` = no wait)
/// - `backoff`: Grow the wait linearly (`interval × attempt`); ignored without `interval`
/// - `jitter`: Randomization applied to each wait
///
/// ## Notes
/// All fields are public for flexibility. Validation happens once, when the poller is built.
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Maximum number of producer calls for one poll invocation.
    ///
    /// The poll fails with `PollError::AttemptsExceeded` when this many attempts
    /// completed without an accepted value. Zero is rejected at build time.
    pub max_attempts: u32,

    /// Delay between attempts.
    ///
    /// Overridden entirely by a delay function when one is set.
    pub interval: Option<Duration>,

    /// Linear backoff of `interval`.
    ///
    /// - `false`: every wait is `interval`
    /// - `true`: the wait after attempt `n` is `interval × n`
    pub backoff: bool,

    /// Jitter applied to each computed wait.
    pub jitter: JitterPolicy,
}

impl PollConfig {
    /// Creates a config with the given attempt ceiling and no delay.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Checks that the config can drive a poll.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        Ok(())
    }
}

impl Default for PollConfig {
    /// Default configuration:
    ///
    /// - `max_attempts = 10`
    /// - `interval = None` (attempts back to back)
    /// - `backoff = false`
    /// - `jitter = JitterPolicy::None`
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: None,
            backoff: false,
            jitter: JitterPolicy::None,
        }
    }
}
