//! Delay and jitter policies.
//!
//! This module groups the knobs that control **how long** the poller waits
//! between a rejected attempt and the next one.
//!
//! ## Contents
//! - [`DelayPolicy`]  how the wait is computed (immediate / fixed / linear backoff / custom)
//! - [`JitterPolicy`] randomization applied on top of the computed wait
//!
//! ## Quick wiring
//! ```text
//! PollConfig { interval, backoff, jitter } + delay_fn
//!      └─► PollerBuilder::build() resolves DelayPolicy once
//!           └─► core::poller::run_poll uses:
//!                - delay.next(attempt) after every completed attempt
//!                - jitter.apply(delay) right before sleeping
//! ```
//!
//! ## Defaults
//! - No interval and no delay function → `DelayPolicy::Immediate`.
//! - `JitterPolicy::None` by default; delays are exact.

mod delay;
mod jitter;

pub use delay::{DelayFn, DelayPolicy};
pub use jitter::JitterPolicy;
