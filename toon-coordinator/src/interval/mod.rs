/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Common-interval calculation for a set of poll periods.
//!
//! The device is polled by a single timer.  That timer fires every
//! *common interval* (the GCD of all requested periods) and each task runs
//! on every `relative_interval`-th tick, where
//! `relative_interval = period / common_interval`.
//!
//! ```text
//! periods        boiler 60 s   meter 10 s   thermostat 10 s
//! common              10 s
//! relative             6            1              1
//! tick:  0  1  2  3  4  5  0  1 ...
//! boiler ✓  .  .  .  .  .  ✓  .
//! meter  ✓  ✓  ✓  ✓  ✓  ✓  ✓  ✓
//! ```
//!
//! The tick counter wraps at `max_relative_interval`, so it never grows
//! without bound and every task stays phase-aligned to tick 0.

pub mod math;

use std::time::Duration;

use tracing::{debug, info};

use math::gcd_of_slice;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur while deriving a [`TickPlan`].
#[derive(Debug, PartialEq, Eq)]
pub enum IntervalError {
    /// The period slice was empty.
    NoPeriods,

    /// The period at `position` was zero.  A zero period has no meaningful
    /// tick and would make every relative interval undefined.
    ZeroPeriod { position: usize },
}

impl std::fmt::Display for IntervalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntervalError::NoPeriods => write!(f, "no poll periods supplied"),
            IntervalError::ZeroPeriod { position } => {
                write!(f, "poll period at position {position} is zero")
            }
        }
    }
}

impl std::error::Error for IntervalError {}

// ── TickPlan ──────────────────────────────────────────────────────────────────

/// The timer cadence and per-task tick divisors for a fixed set of periods.
///
/// Position `i` in [`relative_intervals`](Self::relative_intervals) belongs to
/// period `i` of the slice passed to [`TickPlan::from_periods`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickPlan {
    common_interval_secs: u64,
    relative_intervals: Vec<u64>,
    max_relative_interval: u64,
}

impl TickPlan {
    /// Derive the plan for `periods` (seconds).
    ///
    /// # Errors
    /// * [`IntervalError::NoPeriods`] – `periods` is empty.
    /// * [`IntervalError::ZeroPeriod`] – some period is `0`.
    pub fn from_periods(periods: &[u64]) -> Result<Self, IntervalError> {
        if periods.is_empty() {
            return Err(IntervalError::NoPeriods);
        }
        if let Some(position) = periods.iter().position(|&p| p == 0) {
            return Err(IntervalError::ZeroPeriod { position });
        }

        let common_interval_secs = gcd_of_slice(periods);

        // Exact: the GCD divides every period
        let relative_intervals: Vec<u64> = periods
            .iter()
            .map(|&p| p / common_interval_secs)
            .collect();

        let max_relative_interval = relative_intervals.iter().copied().max().unwrap_or(1);

        info!(
            common_interval_secs,
            max_relative_interval,
            task_count = periods.len(),
            "Calculated poll tick plan"
        );
        for (period, relative) in periods.iter().zip(&relative_intervals) {
            debug!(period_secs = period, relative_interval = relative, "  task cadence");
        }

        Ok(Self {
            common_interval_secs,
            relative_intervals,
            max_relative_interval,
        })
    }

    /// Timer period in seconds.
    pub fn common_interval_secs(&self) -> u64 {
        self.common_interval_secs
    }

    /// Timer period as a [`Duration`].
    pub fn common_interval(&self) -> Duration {
        Duration::from_secs(self.common_interval_secs)
    }

    /// Tick divisor for every task, in registration order.
    pub fn relative_intervals(&self) -> &[u64] {
        &self.relative_intervals
    }

    /// Length of one full rotation of the tick counter.
    pub fn max_relative_interval(&self) -> u64 {
        self.max_relative_interval
    }

    /// Returns `true` if the task at `position` must run on `tick`.
    ///
    /// Unknown positions are never due.
    pub fn is_due(&self, position: usize, tick: u64) -> bool {
        self.relative_intervals
            .get(position)
            .is_some_and(|&relative| tick % relative == 0)
    }

    /// Positions of every task due on `tick`, in registration order.
    pub fn due_positions(&self, tick: u64) -> impl Iterator<Item = usize> + '_ {
        self.relative_intervals
            .iter()
            .enumerate()
            .filter(move |(_, relative)| tick % **relative == 0)
            .map(|(position, _)| position)
    }

    /// The tick that follows `tick`, wrapping at `max_relative_interval`.
    pub fn next_tick(&self, tick: u64) -> u64 {
        (tick + 1) % self.max_relative_interval
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
