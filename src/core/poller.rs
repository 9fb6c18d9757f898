//! # Poller: the attempt / evaluate / wait loop.
//!
//! Drives one producer until its result is accepted, the attempt ceiling is hit,
//! or the producer fails.
//!
//! ## Attempt flow
//! ```text
//! Poller::poll(producer, accept)
//!
//! loop {
//!   ├─► cancelled? ───────────────────────────► Err(Canceled)
//!   ├─► value = producer().await
//!   │       └─ Err(e) ────────────────────────► Err(Producer(e))   (no delay computed)
//!   ├─► attempt += 1
//!   ├─► delay = delay_policy.next(attempt)     (computed even for the last attempt)
//!   ├─► accept(&value)
//!   │       ├─ true ──────────────────────────► Ok(value)
//!   │       └─ false && attempt == max ───────► Err(AttemptsExceeded)
//!   └─► sleep(jitter.apply(delay))             (cancellable)
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially** (never concurrent within one poll)
//! - Attempt counter starts at zero for every `poll` call and never resets within it
//! - `accept` runs at most once per completed attempt
//! - The delay policy is consulted exactly once per completed attempt

use std::future::Future;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    error::PollError,
    policies::{DelayPolicy, JitterPolicy},
};

use super::{builder::PollerBuilder, config::PollConfig};

/// Repeats an async producer until a predicate accepts its result.
///
/// A `Poller` holds only timing settings; each [`poll`](Poller::poll) call owns
/// its own attempt counter, so one poller can serve many concurrent polls.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use pollvisor::{PollConfig, Poller};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let poller = Poller::builder(PollConfig::new(5))
///         .with_interval(Duration::from_millis(1))
///         .build()?;
///
///     let mut checks = 0;
///     let state = poller
///         .poll(
///             || {
///                 checks += 1;
///                 let state = if checks >= 3 { "DONE" } else { "PENDING" };
///                 async move { Ok::<_, std::io::Error>(state) }
///             },
///             |state| *state == "DONE",
///         )
///         .await?;
///
///     assert_eq!(state, "DONE");
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Poller {
    max_attempts: u32,
    delay: DelayPolicy,
    jitter: JitterPolicy,
    cancel: Option<CancellationToken>,
}

impl Poller {
    /// Builds a poller straight from a config.
    pub fn new(cfg: PollConfig) -> Result<Self, crate::error::ConfigError> {
        PollerBuilder::new(cfg).build()
    }

    /// Returns a builder seeded with `cfg`.
    pub fn builder(cfg: PollConfig) -> PollerBuilder {
        PollerBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        max_attempts: u32,
        delay: DelayPolicy,
        jitter: JitterPolicy,
        cancel: Option<CancellationToken>,
    ) -> Self {
        Self {
            max_attempts,
            delay,
            jitter,
            cancel,
        }
    }

    /// Returns the attempt ceiling.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the resolved delay policy.
    pub fn delay(&self) -> &DelayPolicy {
        &self.delay
    }

    /// Returns the jitter policy.
    pub fn jitter(&self) -> JitterPolicy {
        self.jitter
    }

    /// Calls `producer` until `accept` returns `true` for its value.
    ///
    /// ### Outcomes
    /// - `Ok(value)`: the first accepted value; no calls are made after it.
    /// - `Err(PollError::Producer(e))`: the producer failed; returned immediately.
    /// - `Err(PollError::AttemptsExceeded { .. })`: `max_attempts` values were all rejected.
    /// - `Err(PollError::Canceled { .. })`: only when a cancellation token was attached.
    ///
    /// ### Delay semantics
    /// After each completed attempt the delay policy is asked for the next wait
    /// *before* `accept` runs, so a delay function sees every attempt number
    /// `1..=n`, including the final one whose delay is never slept.
    pub async fn poll<T, E, P, Fut, A>(&self, mut producer: P, accept: A) -> Result<T, PollError<E>>
    where
        P: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        A: Fn(&T) -> bool,
    {
        let mut attempt: u32 = 0;

        loop {
            if self.is_cancelled() {
                debug!(attempt, "poll cancelled before attempt");
                return Err(PollError::Canceled { attempts: attempt });
            }

            let value = match producer().await {
                Ok(value) => value,
                Err(e) => {
                    debug!(attempt = attempt + 1, "producer failed; stopping poll");
                    return Err(PollError::Producer(e));
                }
            };
            attempt += 1;

            let delay = self.delay.next(attempt);
            let accepted = accept(&value);
            debug!(
                attempt,
                max_attempts = self.max_attempts,
                accepted,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "poll attempt completed"
            );

            if accepted {
                return Ok(value);
            }
            if attempt == self.max_attempts {
                debug!(attempt, "poll exhausted max attempts");
                return Err(PollError::AttemptsExceeded {
                    max_attempts: self.max_attempts,
                });
            }

            let wait = self.jitter.apply(delay);
            match &self.cancel {
                Some(token) => {
                    let sleep = time::sleep(wait);
                    tokio::pin!(sleep);
                    select! {
                        biased;
                        _ = token.cancelled() => {
                            debug!(attempt, "poll cancelled during wait");
                            return Err(PollError::Canceled { attempts: attempt });
                        }
                        _ = &mut sleep => {}
                    }
                }
                None => time::sleep(wait).await,
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Status {
        Pending,
        Done,
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Backend(&'static str);

    /// Producer reporting `Done` from call number `done_from` on; counts calls in `calls`.
    fn status_producer(
        calls: &Arc<AtomicU32>,
        done_from: u32,
    ) -> impl FnMut() -> std::future::Ready<Result<Status, Backend>> {
        let calls = Arc::clone(calls);
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            let status = if n >= done_from {
                Status::Done
            } else {
                Status::Pending
            };
            std::future::ready(Ok(status))
        }
    }

    fn is_done(s: &Status) -> bool {
        *s == Status::Done
    }

    fn recording_delay(seen: &Arc<Mutex<Vec<u32>>>) -> impl Fn(u32) -> Duration + Send + Sync {
        let seen = Arc::clone(seen);
        move |attempt| {
            seen.lock().unwrap().push(attempt);
            Duration::from_millis(10)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_max_attempts() {
        let poller = Poller::builder(PollConfig::new(5))
            .with_interval(Duration::from_millis(10))
            .build()
            .unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let res = poller.poll(status_producer(&calls, 7), is_done).await;

        assert!(matches!(
            res,
            Err(PollError::AttemptsExceeded { max_attempts: 5 })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_acceptance() {
        let poller = Poller::builder(PollConfig::new(12))
            .with_interval(Duration::from_millis(10))
            .build()
            .unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let res = poller.poll(status_producer(&calls, 2), is_done).await;

        assert_eq!(res.unwrap(), Status::Done);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_fn_called_for_every_attempt() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let poller = Poller::builder(PollConfig::new(5))
            .with_delay_fn(recording_delay(&seen))
            .build()
            .unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let res = poller.poll(status_producer(&calls, 7), is_done).await;

        assert!(res.unwrap_err().is_exhausted());
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_fn_called_for_accepted_attempt() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let poller = Poller::builder(PollConfig::new(12))
            .with_delay_fn(recording_delay(&seen))
            .build()
            .unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let res = poller.poll(status_producer(&calls, 2), is_done).await;

        assert_eq!(res.unwrap(), Status::Done);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_fn_governs_wait() {
        let poller = Poller::builder(PollConfig::new(4))
            .with_interval(Duration::from_secs(60))
            .with_delay_fn(|attempt| Duration::from_millis(u64::from(attempt) * 100))
            .build()
            .unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let start = Instant::now();
        let _ = poller.poll(status_producer(&calls, 99), is_done).await;

        // waits after attempts 1..=3: 100 + 200 + 300
        assert_eq!(start.elapsed(), Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_producer_failure_propagates() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let poller = Poller::builder(PollConfig::new(10))
            .with_delay_fn(recording_delay(&seen))
            .build()
            .unwrap();
        let calls = AtomicU32::new(0);
        let accepted = AtomicU32::new(0);

        let res = poller
            .poll(
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    async move {
                        if n == 3 {
                            Err(Backend("boom"))
                        } else {
                            Ok(Status::Pending)
                        }
                    }
                },
                |s: &Status| {
                    accepted.fetch_add(1, Ordering::SeqCst);
                    is_done(s)
                },
            )
            .await;

        assert_eq!(res.unwrap_err().into_producer(), Some(Backend("boom")));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(accepted.load(Ordering::SeqCst), 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_interval_waits() {
        let poller = Poller::builder(PollConfig::new(5))
            .with_interval(Duration::from_millis(10))
            .build()
            .unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let start = Instant::now();
        let _ = poller.poll(status_producer(&calls, 99), is_done).await;

        assert_eq!(start.elapsed(), Duration::from_millis(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_grows_linearly() {
        let poller = Poller::builder(PollConfig::new(5))
            .with_interval(Duration::from_millis(10))
            .with_backoff(true)
            .build()
            .unwrap();
        let start = Instant::now();
        let stamps = Mutex::new(Vec::new());

        let res = poller
            .poll(
                || {
                    stamps.lock().unwrap().push(start.elapsed());
                    async { Ok::<_, Backend>(Status::Pending) }
                },
                is_done,
            )
            .await;

        assert!(res.unwrap_err().is_exhausted());
        let ms: Vec<u128> = stamps.lock().unwrap().iter().map(|d| d.as_millis()).collect();
        // gaps: 10, 20, 30, 40
        assert_eq!(ms, vec![0, 10, 30, 60, 100]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_ignored_without_interval() {
        let poller = Poller::builder(PollConfig::new(3))
            .with_backoff(true)
            .build()
            .unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let start = Instant::now();
        let _ = poller.poll(status_producer(&calls, 99), is_done).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt() {
        let poller = Poller::new(PollConfig::new(1)).unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let res = poller.poll(status_producer(&calls, 2), is_done).await;

        assert!(res.unwrap_err().is_exhausted());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_attempt_still_evaluated() {
        let poller = Poller::new(PollConfig::new(3)).unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let res = poller.poll(status_producer(&calls, 3), is_done).await;

        assert_eq!(res.unwrap(), Status::Done);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_poll_starts_fresh() {
        let poller = Poller::builder(PollConfig::new(3))
            .with_interval(Duration::from_millis(5))
            .build()
            .unwrap();
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));

        let (a, b) = tokio::join!(
            poller.poll(status_producer(&first, 99), is_done),
            poller.poll(status_producer(&second, 3), is_done),
        );

        assert!(a.unwrap_err().is_exhausted());
        assert_eq!(b.unwrap(), Status::Done);
        assert_eq!(first.load(Ordering::SeqCst), 3);
        assert_eq!(second.load(Ordering::SeqCst), 3);

        let again = poller.poll(status_producer(&first, 5), is_done).await;
        assert_eq!(again.unwrap(), Status::Done);
        assert_eq!(first.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_attempt() {
        let token = CancellationToken::new();
        token.cancel();
        let poller = Poller::builder(PollConfig::new(3))
            .with_cancel(token)
            .build()
            .unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let res = poller.poll(status_producer(&calls, 1), is_done).await;

        assert!(matches!(res, Err(PollError::Canceled { attempts: 0 })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait() {
        let token = CancellationToken::new();
        let poller = Poller::builder(PollConfig::new(10))
            .with_interval(Duration::from_millis(100))
            .with_cancel(token.clone())
            .build()
            .unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let (res, ()) = tokio::join!(
            poller.poll(status_producer(&calls, 99), is_done),
            async {
                time::sleep(Duration::from_millis(150)).await;
                token.cancel();
            },
        );

        assert!(matches!(res, Err(PollError::Canceled { attempts: 2 })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_producer_runs_still_accepts() {
        let token = CancellationToken::new();
        let poller = Poller::builder(PollConfig::new(5))
            .with_cancel(token.clone())
            .build()
            .unwrap();
        let calls = AtomicU32::new(0);

        let start = Instant::now();
        let (res, ()) = tokio::join!(
            poller.poll(
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async {
                        time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, Backend>(Status::Done)
                    }
                },
                is_done,
            ),
            async {
                time::sleep(Duration::from_millis(20)).await;
                token.cancel();
            },
        );

        assert_eq!(res.unwrap(), Status::Done);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_producer_runs_then_rejected() {
        let token = CancellationToken::new();
        let poller = Poller::builder(PollConfig::new(5))
            .with_cancel(token.clone())
            .build()
            .unwrap();
        let calls = AtomicU32::new(0);

        let (res, ()) = tokio::join!(
            poller.poll(
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async {
                        time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, Backend>(Status::Pending)
                    }
                },
                is_done,
            ),
            async {
                time::sleep(Duration::from_millis(20)).await;
                token.cancel();
            },
        );

        // zero wait with a fired token: cancellation wins, no second call
        assert!(matches!(res, Err(PollError::Canceled { attempts: 1 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_applies_to_backoff_waits() {
        let interval = Duration::from_millis(100);
        let poller = Poller::builder(PollConfig::new(4))
            .with_interval(interval)
            .with_backoff(true)
            .with_jitter(JitterPolicy::Equal)
            .build()
            .unwrap();
        let start = Instant::now();
        let stamps = Mutex::new(Vec::new());

        let res = poller
            .poll(
                || {
                    stamps.lock().unwrap().push(start.elapsed());
                    async { Ok::<_, Backend>(Status::Pending) }
                },
                is_done,
            )
            .await;

        assert!(res.unwrap_err().is_exhausted());
        let stamps = stamps.lock().unwrap();
        assert_eq!(stamps.len(), 4);
        for (n, pair) in (1u32..).zip(stamps.windows(2)) {
            let gap = pair[1] - pair[0];
            let base = interval * n;
            assert!(
                gap >= base / 2 && gap <= base,
                "wait after attempt {}: {:?} outside [{:?}, {:?}]",
                n,
                gap,
                base / 2,
                base
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_producer_is_awaited() {
        let poller = Poller::new(PollConfig::new(4)).unwrap();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);

        let start = Instant::now();
        let res = poller
            .poll(
                move || {
                    let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                    async move {
                        time::sleep(Duration::from_millis(10)).await;
                        Ok::<_, Backend>(if n > 1 { Status::Done } else { Status::Pending })
                    }
                },
                is_done,
            )
            .await;

        assert_eq!(res.unwrap(), Status::Done);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(20));
    }
}
