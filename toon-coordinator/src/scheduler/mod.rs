/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Multi-rate poll scheduler.
//!
//! [`PollScheduler`] polls several Toon subsystems, each at its own period,
//! from one timer.  The timer fires every common interval (see
//! [`TickPlan`]); each call to [`PollScheduler::refresh`] is one *cycle*:
//!
//! 1. every task due on the current tick is fetched, one after the other, in
//!    registration order;
//! 2. the first failing fetch aborts the rest of the cycle and the cycle
//!    returns [`UpdateFailed`];
//! 3. the tick counter advances (also after a failure, so the next cycle
//!    keeps the phase instead of retrying the same due set);
//! 4. on success the client's current snapshot is returned.
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | Concurrency | Fetches within a cycle are sequential; the Toon is a single low-powered endpoint |
//! | Re-entrancy | `refresh(&mut self)`: one cycle at a time is enforced by the borrow, no mutex |
//! | Failure | Uniform across subsystems; the caller inspects [`UpdateFailed::cause`] |
//! | Snapshot | Forwarded as `Arc`, never touched by the scheduler |
//!
//! # Example
//! ```rust,ignore
//! let mut scheduler = PollScheduler::from_config(client, &config.polling)?;
//! let snapshot = scheduler.refresh().await?;
//! ```

pub mod error;

pub use error::{ConfigurationError, UpdateFailed};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::PollingConfig;
use crate::device::DeviceClient;
use crate::interval::TickPlan;
use crate::task::{tasks_from_config, Subsystem, UpdateTask};

// ── SchedulePlan ──────────────────────────────────────────────────────────────

/// The enabled tasks in registration order together with their tick plan.
///
/// Pure data: building and inspecting a plan needs no device client, so the
/// binary can print it before anything is polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePlan {
    subsystems: Vec<Subsystem>,
    periods: Vec<u64>,
    ticks: TickPlan,
}

impl SchedulePlan {
    /// Select the enabled tasks and derive their tick plan.
    ///
    /// # Errors
    /// * [`ConfigurationError::NoEnabledTasks`] – nothing is enabled.
    /// * [`ConfigurationError::NonPositivePeriod`] – an enabled task has a
    ///   zero period.  Disabled tasks are not checked.
    pub fn build(tasks: &[UpdateTask]) -> Result<Self, ConfigurationError> {
        let (subsystems, periods): (Vec<Subsystem>, Vec<u64>) = tasks
            .iter()
            .filter(|t| t.enabled)
            .map(|t| (t.subsystem, t.period_secs))
            .unzip();

        let ticks = TickPlan::from_periods(&periods)
            .map_err(|e| ConfigurationError::from_interval(e, &subsystems))?;

        Ok(Self {
            subsystems,
            periods,
            ticks,
        })
    }

    /// Enabled subsystems in registration (= execution) order.
    pub fn subsystems(&self) -> &[Subsystem] {
        &self.subsystems
    }

    /// Configured period of every enabled subsystem, same order as
    /// [`subsystems`](Self::subsystems).
    pub fn periods_secs(&self) -> &[u64] {
        &self.periods
    }

    pub fn tick_plan(&self) -> &TickPlan {
        &self.ticks
    }

    /// How often the timer driving this plan must fire.
    pub fn common_interval(&self) -> Duration {
        self.ticks.common_interval()
    }

    /// Subsystems fetched on `tick`, in execution order.
    pub fn due_at(&self, tick: u64) -> Vec<Subsystem> {
        self.ticks
            .due_positions(tick)
            .map(|position| self.subsystems[position])
            .collect()
    }
}

// ── PollScheduler ─────────────────────────────────────────────────────────────

/// Drives one device client through its [`SchedulePlan`].
///
/// Created once per device session and never reconfigured; build a new one
/// to change the task set.  The tick counter starts at 0 and is not
/// persisted.
#[derive(Debug)]
pub struct PollScheduler<C: DeviceClient + ?Sized> {
    client: Arc<C>,
    plan: SchedulePlan,
    tick: u64,
}

impl<C: DeviceClient + ?Sized> PollScheduler<C> {
    /// Build a scheduler for `tasks`, polled in the given order.
    pub fn new(client: Arc<C>, tasks: &[UpdateTask]) -> Result<Self, ConfigurationError> {
        let plan = SchedulePlan::build(tasks)?;

        info!(
            common_interval_secs = plan.tick_plan().common_interval_secs(),
            max_relative_interval = plan.tick_plan().max_relative_interval(),
            subsystems = ?plan.subsystems(),
            "Poll scheduler ready"
        );

        Ok(Self {
            client,
            plan,
            tick: 0,
        })
    }

    /// Build a scheduler from configuration.  The thermostat task is always
    /// included.
    pub fn from_config(client: Arc<C>, polling: &PollingConfig) -> Result<Self, ConfigurationError> {
        Self::new(client, &tasks_from_config(polling))
    }

    pub fn plan(&self) -> &SchedulePlan {
        &self.plan
    }

    /// Timer period the owner must drive [`refresh`](Self::refresh) at.
    pub fn common_interval(&self) -> Duration {
        self.plan.common_interval()
    }

    /// Tick the next cycle will run.  Always `< max_relative_interval`.
    pub fn tick_counter(&self) -> u64 {
        self.tick
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Run one cycle.
    ///
    /// # Errors
    /// Returns [`UpdateFailed`] carrying the first fetch error.  Tasks after
    /// the failing one are not fetched this cycle.
    pub async fn refresh(&mut self) -> Result<Arc<C::Snapshot>, UpdateFailed> {
        let tick = self.tick;
        let outcome = self.fetch_due(tick).await;

        // Advance on failure too: the next cycle resumes at the next phase
        self.tick = self.plan.ticks.next_tick(tick);

        match outcome {
            Ok(fetched) => {
                debug!(tick, fetched, next_tick = self.tick, "Poll cycle complete");
                Ok(self.client.snapshot())
            }
            Err(err) => {
                warn!(tick, next_tick = self.tick, error = %err, "Poll cycle failed");
                Err(err)
            }
        }
    }

    /// Fetch every task due on `tick`; returns how many were fetched.
    async fn fetch_due(&self, tick: u64) -> Result<usize, UpdateFailed> {
        let mut fetched = 0usize;

        for position in self.plan.ticks.due_positions(tick) {
            let subsystem = self.plan.subsystems[position];
            debug!(tick, %subsystem, "fetching");

            if let Err(err) = subsystem.fetch(self.client.as_ref()).await {
                warn!(tick, %subsystem, error = %err, "✗ fetch failed, aborting cycle");
                return Err(UpdateFailed::new(err));
            }
            fetched += 1;
        }

        Ok(fetched)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
