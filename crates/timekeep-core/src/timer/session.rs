//! Cancellable countdown session.
//!
//! [`CountdownSession::start`] spawns a tokio task that steps a [`Countdown`]
//! once per second and forwards each [`Tick`] over a bounded channel.
//! Cancellation is cooperative: the task checks a [`CancellationToken`] at
//! every suspension point, and the shared state machine refuses to step once
//! cancelled, so no tick is produced after [`CountdownSession::cancel`]
//! returns.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::engine::{Countdown, Phase, Tick};
use super::preset::Durations;
use crate::error::Result;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const TICK_BUFFER: usize = 16;

/// Point-in-time view of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountdownSnapshot {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub phase_total_secs: u64,
    pub phase_progress: f64,
}

struct Shared {
    countdown: Mutex<Countdown>,
    token: CancellationToken,
}

impl Shared {
    fn countdown(&self) -> MutexGuard<'_, Countdown> {
        self.countdown.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cancel(&self) -> bool {
        let cancelled = self.countdown().cancel();
        if cancelled {
            self.token.cancel();
        }
        cancelled
    }
}

/// One run of a focus/break cycle. Single use: a finished or cancelled
/// session cannot be restarted.
pub struct CountdownSession {
    shared: Arc<Shared>,
}

impl Default for CountdownSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownSession {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                countdown: Mutex::new(Countdown::new()),
                token: CancellationToken::new(),
            }),
        }
    }

    /// Begin focusing and return the tick stream.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// `SessionActive` if this session was already started.
    pub fn start(&self, durations: impl Into<Durations>) -> Result<TickStream> {
        let durations = durations.into();
        let first = self.shared.countdown().start(durations)?;
        info!(
            focus_secs = durations.focus_secs(),
            break_secs = durations.break_secs(),
            "countdown started"
        );

        let (tx, rx) = mpsc::channel(TICK_BUFFER);
        tokio::spawn(drive(Arc::clone(&self.shared), first, tx));
        Ok(TickStream {
            rx,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Stop a running countdown. A no-op when idle or already terminal.
    pub fn cancel(&self) {
        if self.shared.cancel() {
            info!("countdown cancelled");
        }
    }

    pub fn phase(&self) -> Phase {
        self.shared.countdown().phase()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.shared.countdown().remaining_secs()
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        let countdown = self.shared.countdown();
        CountdownSnapshot {
            phase: countdown.phase(),
            remaining_secs: countdown.remaining_secs(),
            phase_total_secs: countdown.phase_total_secs(),
            phase_progress: countdown.phase_progress(),
        }
    }
}

/// Finite stream of ticks from one session. Ends after the `Finished` tick
/// or as soon as the session is cancelled. Dropping it cancels the session.
pub struct TickStream {
    rx: mpsc::Receiver<Tick>,
    shared: Arc<Shared>,
}

impl TickStream {
    /// Next tick, or `None` once the stream has ended. Ticks still buffered
    /// when the session is cancelled are discarded.
    pub async fn next(&mut self) -> Option<Tick> {
        let tick = self.rx.recv().await?;
        if self.shared.countdown().phase() == Phase::Cancelled {
            self.rx.close();
            return None;
        }
        Some(tick)
    }
}

impl Drop for TickStream {
    fn drop(&mut self) {
        if self.shared.cancel() {
            debug!("tick stream dropped, countdown cancelled");
        }
    }
}

async fn drive(shared: Arc<Shared>, first: Tick, tx: mpsc::Sender<Tick>) {
    let mut clock = tokio::time::interval(TICK_PERIOD);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick completes immediately and belongs to `first`.
    clock.tick().await;

    let mut next = Some(first);
    while let Some(tick) = next {
        tokio::select! {
            biased;
            _ = shared.token.cancelled() => return,
            sent = tx.send(tick) => {
                if sent.is_err() {
                    shared.cancel();
                    return;
                }
            }
        }
        debug!(phase = %tick.phase, remaining_secs = tick.remaining_secs, "tick");
        if tick.phase.is_terminal() {
            info!("countdown finished");
            return;
        }

        tokio::select! {
            biased;
            _ = shared.token.cancelled() => return,
            _ = clock.tick() => {}
        }
        next = shared.countdown().step();
    }
}
