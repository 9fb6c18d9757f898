//! # Example: wait_for_done
//!
//! Polls a simulated job until it reports `Done`, with linear backoff between checks.
//!
//! ## Flow
//! ```text
//! Poller::poll()
//!   ├─► check #1 → Pending → wait 50ms
//!   ├─► check #2 → Pending → wait 100ms
//!   ├─► check #3 → Pending → wait 150ms
//!   └─► check #4 → Done    → Ok(Done)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example wait_for_done
//! ```

use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::{Duration, Instant},
};

use pollvisor::{PollConfig, PollError, Poller};

static CHECKS: AtomicU32 = AtomicU32::new(0);

#[derive(Debug, PartialEq)]
enum JobState {
    Pending,
    Done,
}

async fn fetch_job_state() -> Result<JobState, std::io::Error> {
    let n = CHECKS.fetch_add(1, Ordering::Relaxed) + 1;
    tokio::time::sleep(Duration::from_millis(10)).await;
    println!("[job] check #{n}");
    Ok(if n >= 4 { JobState::Done } else { JobState::Pending })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Up to 10 checks, 50ms apart, growing by 50ms each time
    let poller = Poller::builder(PollConfig::new(10))
        .with_interval(Duration::from_millis(50))
        .with_backoff(true)
        .build()?;

    // 2. Poll until the job is done
    let started = Instant::now();
    let state = poller
        .poll(fetch_job_state, |s| *s == JobState::Done)
        .await?;
    println!("[main] {state:?} after {:?}", started.elapsed());

    // 3. A condition that never holds exhausts the attempts
    let short = Poller::new(PollConfig::new(3))?;
    match short
        .poll(
            || async { Ok::<_, std::io::Error>(JobState::Pending) },
            |s| *s == JobState::Done,
        )
        .await
    {
        Err(PollError::AttemptsExceeded { max_attempts }) => {
            println!("[main] gave up after {max_attempts} attempts");
        }
        other => println!("[main] unexpected: {other:?}"),
    }
    Ok(())
}
