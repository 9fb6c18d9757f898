//! # Jitter policy for poll delays.
//!
//! [`JitterPolicy`] adds randomness to the wait between attempts so that many pollers
//! started together do not hit the backend in lockstep.
//!
//! - [`JitterPolicy::None`] — no randomization, exact delays (default)
//! - [`JitterPolicy::Full`] — random delay in [0, delay]
//! - [`JitterPolicy::Equal`] — delay/2 + random[0, delay/2]
//!
//! Jitter is applied to the value returned by [`DelayPolicy::next`](crate::DelayPolicy::next)
//! right before sleeping. It never changes what the delay policy computes for later attempts.

use rand::Rng;
use std::time::Duration;

/// Randomization applied to the wait between attempts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: sleep for the exact computed delay.
    #[default]
    None,

    /// Full jitter: random delay in [0, delay].
    Full,

    /// Equal jitter: delay/2 + random[0, delay/2].
    ///
    /// Keeps at least half of the computed delay.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => full_jitter(delay),
            JitterPolicy::Equal => equal_jitter(delay),
        }
    }
}

/// Full jitter: random[0, delay]
fn full_jitter(delay: Duration) -> Duration {
    let ns = nanos(delay);
    if ns == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(rand::rng().random_range(0..=ns))
}

/// Equal jitter: delay/2 + random[0, delay/2]
fn equal_jitter(delay: Duration) -> Duration {
    let ns = nanos(delay);
    if ns == 0 {
        return Duration::ZERO;
    }
    let half = ns / 2;
    let jitter = if half == 0 {
        0
    } else {
        rand::rng().random_range(0..=half)
    };
    Duration::from_nanos(half + jitter)
}

fn nanos(delay: Duration) -> u64 {
    u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX)
}
