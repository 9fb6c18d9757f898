use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    core::PollConfig,
    error::ConfigError,
    policies::{DelayFn, DelayPolicy, JitterPolicy},
};
use super::poller::Poller;

/// Builder for constructing a [`Poller`] with optional features.
pub struct PollerBuilder {
    cfg: PollConfig,
    delay_fn: Option<DelayFn>,
    cancel: Option<CancellationToken>,
}

impl PollerBuilder {
    /// Creates a new builder seeded with the given configuration.
    pub fn new(cfg: PollConfig) -> Self {
        Self {
            cfg,
            delay_fn: None,
            cancel: None,
        }
    }

    /// Sets the maximum number of producer calls per poll.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.cfg.max_attempts = max_attempts;
        self
    }

    /// Sets a fixed delay between attempts.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.cfg.interval = Some(interval);
        self
    }

    /// Enables or disables linear backoff of the interval.
    pub fn with_backoff(mut self, backoff: bool) -> Self {
        self.cfg.backoff = backoff;
        self
    }

    /// Sets the jitter applied to each wait.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.cfg.jitter = jitter;
        self
    }

    /// Sets a function computing the delay after each attempt.
    ///
    /// The function receives the 1-based attempt number and is called once per
    /// completed attempt, including the last one. It takes precedence over
    /// the interval and backoff settings.
    pub fn with_delay_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.delay_fn = Some(Arc::new(f));
        self
    }

    /// Attaches a cancellation token.
    ///
    /// The token is checked before every attempt and while waiting between attempts.
    /// A running producer call is never interrupted.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validates the configuration and returns the [`Poller`].
    ///
    /// The delay policy is resolved here, once: delay function, then interval
    /// (with or without backoff), then no delay.
    pub fn build(self) -> Result<Poller, ConfigError> {
        self.cfg.validate()?;

        let delay = DelayPolicy::resolve(self.cfg.interval, self.cfg.backoff, self.delay_fn);
        Ok(Poller::new_internal(
            self.cfg.max_attempts,
            delay,
            self.cfg.jitter,
            self.cancel,
        ))
    }
}
