/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Data-update coordinator: runs the poll scheduler on a timer and publishes
//! the result.
//!
//! ```text
//!            tokio interval (common interval)
//!                      │
//!   first_refresh ──►  Coordinator ──refresh──► PollScheduler ──fetch──► DeviceClient
//!                      │
//!                      └──watch──► CoordinatorHandle (current_snapshot / last_error / subscribe)
//! ```
//!
//! The coordinator owns the scheduler outright and is the only writer of the
//! published state.  Readers hold a cheap [`CoordinatorHandle`]; reading never
//! starts a cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::device::DeviceClient;
use crate::scheduler::{PollScheduler, UpdateFailed};

// ── Published state ───────────────────────────────────────────────────────────

/// What subscribers see after every cycle.
#[derive(Debug)]
pub struct CoordinatorState<S> {
    /// Snapshot of the last successful cycle.  `None` until one succeeds.
    pub snapshot: Option<Arc<S>>,

    /// Failure of the most recent cycle, cleared by the next success.
    pub last_error: Option<UpdateFailed>,

    /// `false` while the most recent cycle failed.  Consumers mark their
    /// entities unavailable on `false`.
    pub last_update_success: bool,

    /// Number of cycles run so far, successful or not.
    pub cycles: u64,
}

impl<S> Clone for CoordinatorState<S> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            last_error: self.last_error.clone(),
            last_update_success: self.last_update_success,
            cycles: self.cycles,
        }
    }
}

impl<S> Default for CoordinatorState<S> {
    fn default() -> Self {
        Self {
            snapshot: None,
            last_error: None,
            last_update_success: false,
            cycles: 0,
        }
    }
}

// ── CoordinatorHandle ─────────────────────────────────────────────────────────

/// Read-only view of a coordinator, handed to the presentation layer.
#[derive(Debug)]
pub struct CoordinatorHandle<S> {
    rx: watch::Receiver<CoordinatorState<S>>,
}

impl<S> Clone for CoordinatorHandle<S> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<S> CoordinatorHandle<S> {
    /// Snapshot of the last successful cycle.
    pub fn current_snapshot(&self) -> Option<Arc<S>> {
        self.rx.borrow().snapshot.clone()
    }

    /// Failure of the most recent cycle, if it failed.
    pub fn last_error(&self) -> Option<UpdateFailed> {
        self.rx.borrow().last_error.clone()
    }

    pub fn last_update_success(&self) -> bool {
        self.rx.borrow().last_update_success
    }

    /// Full copy of the published state.
    pub fn state(&self) -> CoordinatorState<S> {
        self.rx.borrow().clone()
    }

    /// A receiver that wakes after every cycle, successful or not.
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState<S>> {
        self.rx.clone()
    }
}

// ── Coordinator ───────────────────────────────────────────────────────────────

/// Owns a [`PollScheduler`] and publishes the outcome of each cycle.
#[derive(Debug)]
pub struct Coordinator<C: DeviceClient + ?Sized> {
    name: String,
    scheduler: PollScheduler<C>,
    state: watch::Sender<CoordinatorState<C::Snapshot>>,
}

impl<C: DeviceClient + ?Sized> Coordinator<C> {
    pub fn new(name: impl Into<String>, scheduler: PollScheduler<C>) -> Self {
        let (state, _) = watch::channel(CoordinatorState::default());
        Self {
            name: name.into(),
            scheduler,
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Timer period of the refresh loop.
    pub fn update_interval(&self) -> Duration {
        self.scheduler.common_interval()
    }

    pub fn scheduler(&self) -> &PollScheduler<C> {
        &self.scheduler
    }

    /// A new read-only handle on the published state.
    pub fn handle(&self) -> CoordinatorHandle<C::Snapshot> {
        CoordinatorHandle {
            rx: self.state.subscribe(),
        }
    }

    /// Populate the initial state before any consumer reads it.
    ///
    /// # Errors
    /// Returns [`UpdateFailed`] if the first cycle fails; the failure is
    /// published like any other.
    pub async fn first_refresh(&mut self) -> Result<Arc<C::Snapshot>, UpdateFailed> {
        info!(coordinator = %self.name, "Running first refresh");
        self.refresh().await
    }

    /// Run one cycle and publish its outcome.
    ///
    /// On failure the last good snapshot stays published next to the error.
    pub async fn refresh(&mut self) -> Result<Arc<C::Snapshot>, UpdateFailed> {
        let result = self.scheduler.refresh().await;

        self.state.send_modify(|state| {
            state.cycles += 1;
            match &result {
                Ok(snapshot) => {
                    state.snapshot = Some(Arc::clone(snapshot));
                    state.last_error = None;
                    state.last_update_success = true;
                }
                Err(err) => {
                    state.last_error = Some(err.clone());
                    state.last_update_success = false;
                }
            }
        });

        match &result {
            Ok(_) => debug!(coordinator = %self.name, "Published new snapshot"),
            Err(err) => warn!(coordinator = %self.name, error = %err, "Update failed"),
        }

        result
    }

    /// Drive [`refresh`](Self::refresh) every common interval until
    /// `shutdown` fires or its sender is dropped.
    ///
    /// The first cycle runs one interval after the call: the first refresh
    /// is expected to have run already.  A cycle in progress always finishes
    /// before shutdown is observed.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        let period = self.update_interval();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        // A slow device delays the schedule instead of causing a burst
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            coordinator = %self.name,
            interval_secs = period.as_secs(),
            "Coordinator loop started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    // Failures are already published and logged
                    let _ = self.refresh().await;
                }
            }
        }

        info!(coordinator = %self.name, "Coordinator loop stopped");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
