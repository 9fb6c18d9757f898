//! # pollvisor
//!
//! **Pollvisor** is a small async polling combinator for Rust.
//!
//! It repeatedly calls an async producer until a predicate accepts the produced
//! value, with a hard ceiling on attempts and an optional fixed, linearly growing,
//! or caller-computed delay between attempts. Use it to wait on eventually-consistent
//! conditions ("has this job reached `DONE`?") without writing a bespoke retry loop.
//!
//! ## Architecture
//! ```text
//!   PollConfig ──► PollerBuilder ──► Poller
//!   (+ delay_fn,     │                 │
//!    cancel token)   └─ resolves       └─ poll(producer, accept)
//!                       DelayPolicy          │
//!                                            ▼
//! loop {
//!   ├─► producer().await ──── Err(e) ──────────────► PollError::Producer(e)
//!   ├─► attempt += 1
//!   ├─► delay = DelayPolicy::next(attempt)
//!   ├─► accept(&value) ────── true ────────────────► Ok(value)
//!   ├─► attempt == max_attempts ───────────────────► PollError::AttemptsExceeded
//!   └─► sleep(JitterPolicy::apply(delay))
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types                            |
//! |-------------------|-----------------------------------------------------------|--------------------------------------|
//! | **Polling**       | Sequential attempt loop with a hard attempt ceiling.      | [`Poller`]                           |
//! | **Policies**      | Immediate, fixed, linear backoff or custom delays.        | [`DelayPolicy`], [`JitterPolicy`]    |
//! | **Errors**        | Producer failure vs. exhaustion vs. cancellation.         | [`PollError`], [`ConfigError`]       |
//! | **Configuration** | Plain settings plus a builder for closures and tokens.    | [`PollConfig`], [`PollerBuilder`]    |
//!
//! Attempts are logged at `debug` level through [`tracing`]; install a subscriber to see them.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use pollvisor::{PollConfig, PollError, Poller};
//!
//! #[derive(Debug, PartialEq)]
//! enum Job { Pending, Done }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let poller = Poller::builder(PollConfig::new(12))
//!         .with_interval(Duration::from_millis(5))
//!         .with_backoff(true)
//!         .build()?;
//!
//!     let mut calls = 0;
//!     let job = poller
//!         .poll(
//!             || {
//!                 calls += 1;
//!                 let job = if calls > 1 { Job::Done } else { Job::Pending };
//!                 async move { Ok::<_, std::io::Error>(job) }
//!             },
//!             |job| *job == Job::Done,
//!         )
//!         .await?;
//!     assert_eq!(job, Job::Done);
//!
//!     // A predicate that never matches exhausts the attempts.
//!     let never = Poller::new(PollConfig::new(3))?;
//!     let res = never
//!         .poll(|| async { Ok::<_, std::io::Error>(Job::Pending) }, |job| *job == Job::Done)
//!         .await;
//!     assert!(matches!(res, Err(PollError::AttemptsExceeded { max_attempts: 3 })));
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod policies;

// ---- Public re-exports ----

pub use core::{PollConfig, Poller, PollerBuilder};
pub use error::{ConfigError, PollError};
pub use policies::{DelayFn, DelayPolicy, JitterPolicy};
